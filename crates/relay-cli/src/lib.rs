//! Relay CLI library: command implementations shared by the `relay` binary
//! and the integration tests.

pub mod commands;
