//! Error types for the relay workflow.
//!
//! Configuration problems are detected before any phase runs and surface as
//! [`ConfigError`]. A failing phase never panics or unwinds: the executor
//! returns a [`WorkflowFailure`] that names the phase, carries the results of
//! the phases that did complete, and wraps the underlying [`StepError`].

use std::path::PathBuf;

use crate::workflow::schema::PhaseId;
use crate::workflow::store::PhaseResults;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("{name}={value:?} is invalid: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read agents file '{}'", .path.display())]
    AgentsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse agents YAML")]
    AgentsYaml(#[from] serde_yaml::Error),

    #[error("unknown agent id '{0}' (expected one of: research, analysis, blueprint, reviewer, marketing)")]
    UnknownAgent(String),
}

/// Failure of a single chat-completion request.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion response contained no choices")]
    NoChoices,

    #[error("completion reply was empty")]
    EmptyReply,
}

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error("prompt needs output of phase '{}', which has not run", .0.key())]
    MissingInput(PhaseId),

    #[error("failed to write console output")]
    Console(#[from] std::io::Error),
}

/// The explicit failure result of a pipeline run.
#[derive(Debug, thiserror::Error)]
#[error("phase {} ({}) failed", .phase.number(), .phase.key())]
pub struct WorkflowFailure {
    pub phase: PhaseId,
    /// Results of phases 1..K-1, where K is the failing phase.
    pub completed: PhaseResults,
    #[source]
    pub source: StepError,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workflow(Box<WorkflowFailure>),

    #[error("failed to write results file")]
    Persist(#[source] std::io::Error),

    #[error("failed to write console output")]
    Console(#[source] std::io::Error),
}

impl From<WorkflowFailure> for RelayError {
    fn from(failure: WorkflowFailure) -> Self {
        RelayError::Workflow(Box::new(failure))
    }
}

impl RelayError {
    pub fn is_config(&self) -> bool {
        matches!(self, RelayError::Config(_))
    }
}
