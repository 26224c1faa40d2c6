//! Relay Core — the five-phase prompt-chain workflow.
//!
//! This crate holds the workflow logic with no CLI dependency:
//!
//! - `config` — validated run settings (credentials, endpoint, sampling)
//! - `workflow` — phase schema, agent roster, completion client, executor,
//!   result store and report rendering
//! - `error` — error types for configuration, completion calls and runs

pub mod config;
pub mod error;
pub mod workflow;

// Convenience re-exports
pub use config::Settings;
pub use error::{CallError, ConfigError, RelayError, StepError, WorkflowFailure};
pub use workflow::{PhaseId, PhaseResults, Roster, WorkflowExecutor};
