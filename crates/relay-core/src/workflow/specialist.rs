//! Agent roster — display name and role description for each phase's agent.
//!
//! The five built-in profiles can be overridden from a YAML file:
//!
//! ```yaml
//! agents:
//!   reviewer:
//!     name: "Skeptic"
//!     role: "Venture Capital Partner"
//!   marketing:
//!     role: "Growth Marketer"
//! ```
//!
//! Fields left out keep their built-in value.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::workflow::schema::PhaseId;

/// An agent profile: who runs a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    /// Agent id (e.g., "research", "reviewer")
    pub id: String,
    /// Display name
    pub name: String,
    /// Role description, embedded in the system prompt
    pub role: String,
    /// Whether the profile was changed by an agents file
    pub from_file: bool,
}

impl AgentProfile {
    fn builtin(id: &str, name: &str, role: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            from_file: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgentsFile {
    #[serde(default)]
    agents: BTreeMap<String, AgentOverride>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentOverride {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// One [`AgentProfile`] per phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    profiles: [AgentProfile; 5],
}

impl Default for Roster {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Roster {
    /// Built-in profiles, no files needed.
    pub fn builtin() -> Self {
        Self {
            profiles: [
                AgentProfile::builtin("research", "Research Agent", "Market Research Analyst"),
                AgentProfile::builtin("analysis", "Analysis Agent", "Business Opportunity Analyst"),
                AgentProfile::builtin("blueprint", "Blueprint Agent", "Product Architect"),
                AgentProfile::builtin("reviewer", "Reviewer Agent", "Strategic Advisor"),
                AgentProfile::builtin("marketing", "Marketing Agent", "Go-To-Market Strategist"),
            ],
        }
    }

    /// Parse overrides from a YAML string and apply them to the built-ins.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: AgentsFile = serde_yaml::from_str(yaml)?;
        let mut roster = Self::builtin();
        for (id, over) in file.agents {
            let phase = PhaseId::from_agent_id(&id).ok_or(ConfigError::UnknownAgent(id))?;
            let profile = &mut roster.profiles[phase.index()];
            if let Some(name) = over.name.filter(|n| !n.trim().is_empty()) {
                profile.name = name;
                profile.from_file = true;
            }
            if let Some(role) = over.role.filter(|r| !r.trim().is_empty()) {
                profile.role = role;
                profile.from_file = true;
            }
        }
        Ok(roster)
    }

    /// Load overrides from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::AgentsFile {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::from_yaml(&content)?;
        tracing::info!("[Roster] Loaded agent overrides from '{}'", path.display());
        Ok(roster)
    }

    /// Built-ins, or overrides from `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn get(&self, phase: PhaseId) -> &AgentProfile {
        &self.profiles[phase.index()]
    }

    /// Profiles in phase order.
    pub fn iter(&self) -> impl Iterator<Item = (PhaseId, &AgentProfile)> {
        PhaseId::ALL.into_iter().zip(self.profiles.iter())
    }
}
