//! Workflow engine — a fixed five-phase prompt chain.
//!
//! Each phase asks one agent (role-specific system prompt) to build on the
//! output of the phase before it; the collected outputs are reported on the
//! console and saved to a timestamped results file.
//!
//! # Architecture
//!
//! ```text
//! Settings + Roster ──► WorkflowExecutor ──► PhaseResults ──► report
//!                            │                                  │
//!                      schema::PHASES                  console / results file
//!                            │
//!                     CompletionClient (HTTP)
//!                            │
//!               OpenAI-compatible /chat/completions
//! ```

pub mod agent_caller;
pub mod executor;
pub mod report;
pub mod schema;
pub mod specialist;
pub mod store;

pub use agent_caller::{
    ChatMessage, ChatRole, CompletionClient, CompletionReply, CompletionRequest,
    HttpCompletionClient, TokenUsage,
};
pub use executor::WorkflowExecutor;
pub use schema::{PhaseDescriptor, PhaseId, PHASES};
pub use specialist::{AgentProfile, Roster};
pub use store::PhaseResults;
