//! Phase identifiers and prompt templates.
//!
//! The workflow is a fixed chain of five phases. Each phase differs from the
//! others only in its task description and in how its user prompt embeds the
//! output of earlier phases:
//!
//! ```text
//! research ──► analysis ──► blueprint ──► review ──► marketing
//!                               │                        ▲
//!                               └────────────────────────┘
//! ```

use std::fmt;

use crate::workflow::store::PhaseResults;

/// One of the five fixed workflow phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseId {
    Research,
    Analysis,
    Blueprint,
    Review,
    Marketing,
}

impl PhaseId {
    pub const ALL: [PhaseId; 5] = [
        PhaseId::Research,
        PhaseId::Analysis,
        PhaseId::Blueprint,
        PhaseId::Review,
        PhaseId::Marketing,
    ];

    /// Zero-based position in execution order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based phase number as shown in banners.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    /// Key under which the phase output is stored.
    pub fn key(self) -> &'static str {
        match self {
            PhaseId::Research => "research",
            PhaseId::Analysis => "analysis",
            PhaseId::Blueprint => "blueprint",
            PhaseId::Review => "review",
            PhaseId::Marketing => "marketing",
        }
    }

    /// Roster id of the agent that runs this phase.
    pub fn agent_id(self) -> &'static str {
        match self {
            PhaseId::Review => "reviewer",
            other => other.key(),
        }
    }

    pub fn from_agent_id(id: &str) -> Option<PhaseId> {
        PhaseId::ALL.into_iter().find(|p| p.agent_id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            PhaseId::Research => "MARKET RESEARCH",
            PhaseId::Analysis => "OPPORTUNITY ANALYSIS",
            PhaseId::Blueprint => "PRODUCT BLUEPRINT",
            PhaseId::Review => "STRATEGIC REVIEW",
            PhaseId::Marketing => "MARKETING STRATEGY",
        }
    }

    /// Verb phrase for the "is working" status line.
    pub fn activity(self) -> &'static str {
        match self {
            PhaseId::Research => "analyzing the market",
            PhaseId::Analysis => "identifying opportunities",
            PhaseId::Blueprint => "designing the product",
            PhaseId::Review => "providing recommendations",
            PhaseId::Marketing => "developing marketing strategy",
        }
    }

    /// Phrase used in the closing summary.
    pub fn accomplishment(self) -> &'static str {
        match self {
            PhaseId::Research => "Analyzed the market",
            PhaseId::Analysis => "Identified opportunities",
            PhaseId::Blueprint => "Designed the product",
            PhaseId::Review => "Provided strategic recommendations",
            PhaseId::Marketing => "Developed marketing strategy",
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Static description of a phase: what the agent is asked to do and how the
/// user message is built from earlier results.
pub struct PhaseDescriptor {
    pub id: PhaseId,
    /// Task text appended to the role line of the system prompt.
    pub task: &'static str,
    /// Builds the user message. Returns `None` if a referenced phase has no
    /// stored output yet.
    pub user_prompt: fn(&PhaseResults) -> Option<String>,
}

impl fmt::Debug for PhaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseDescriptor")
            .field("id", &self.id)
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}

impl PhaseDescriptor {
    pub fn system_prompt(&self, role: &str) -> String {
        system_prompt(role, self.task)
    }
}

pub fn system_prompt(role: &str, task: &str) -> String {
    format!("You are a {role}. {task}")
}

pub const RESEARCH_REQUEST: &str = "Analyze the current market for AI-powered interview platforms.";

/// The workflow, in execution order.
pub static PHASES: [PhaseDescriptor; 5] = [
    PhaseDescriptor {
        id: PhaseId::Research,
        task: "Provide a brief analysis of\n\
               3 competitors in AI interview platforms (HireVue, Pymetrics, Codility).\n\
               List their key features and identify market gaps in 150 words.",
        user_prompt: research_prompt,
    },
    PhaseDescriptor {
        id: PhaseId::Analysis,
        task: "Based on the market research provided,\n\
               identify 3 key market opportunities or gaps for a new AI interview platform.\n\
               Be concise in 150 words.",
        user_prompt: analysis_prompt,
    },
    PhaseDescriptor {
        id: PhaseId::Blueprint,
        task: "Based on the market analysis and opportunities,\n\
               create a brief product blueprint including:\n\
               - Key features (3-5)\n\
               - User journey (2-3 steps)\n\
               Keep it concise - 150 words.",
        user_prompt: blueprint_prompt,
    },
    PhaseDescriptor {
        id: PhaseId::Review,
        task: "Review the product blueprint\n\
               and provide 3 strategic recommendations for success.\n\
               Be concise - 150 words.",
        user_prompt: review_prompt,
    },
    PhaseDescriptor {
        id: PhaseId::Marketing,
        task: "Based on the product blueprint and strategic recommendations,\n\
               create a comprehensive go-to-market strategy including:\n\
               - Target customer segments (2-3)\n\
               - Marketing channels and tactics\n\
               - Pricing strategy\n\
               - Launch timeline\n\
               Keep it concise - 150 words.",
        user_prompt: marketing_prompt,
    },
];

pub fn descriptor(id: PhaseId) -> &'static PhaseDescriptor {
    &PHASES[id.index()]
}

fn research_prompt(_: &PhaseResults) -> Option<String> {
    Some(RESEARCH_REQUEST.to_string())
}

fn analysis_prompt(results: &PhaseResults) -> Option<String> {
    let research = results.get(PhaseId::Research)?;
    Some(format!(
        "Market research findings:\n{research}\n\nNow identify market opportunities and gaps."
    ))
}

fn blueprint_prompt(results: &PhaseResults) -> Option<String> {
    let analysis = results.get(PhaseId::Analysis)?;
    Some(format!(
        "Market Analysis:\n{analysis}\n\nCreate a product blueprint for our platform."
    ))
}

fn review_prompt(results: &PhaseResults) -> Option<String> {
    let blueprint = results.get(PhaseId::Blueprint)?;
    Some(format!(
        "Product Blueprint:\n{blueprint}\n\nProvide strategic review and recommendations."
    ))
}

fn marketing_prompt(results: &PhaseResults) -> Option<String> {
    let blueprint = results.get(PhaseId::Blueprint)?;
    let review = results.get(PhaseId::Review)?;
    Some(format!(
        "Product Blueprint:\n{blueprint}\n\n\
         Strategic Recommendations:\n{review}\n\n\
         Develop a comprehensive marketing and launch strategy."
    ))
}
