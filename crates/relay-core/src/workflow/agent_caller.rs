//! Agent Caller — issues chat-completion requests for workflow phases.
//!
//! The executor talks to the model through the [`CompletionClient`] trait.
//! [`HttpCompletionClient`] implements it against any OpenAI-compatible
//! endpoint:
//!
//! ```text
//! POST {base_url}/chat/completions
//! Authorization: Bearer {api_key}
//! { "model", "temperature", "max_tokens", "messages": [system, user] }
//! ```
//!
//! The reply text is taken from the first choice. There is no retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A single chat-completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Text of the first message with the given role.
    pub fn message(&self, role: ChatRole) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default, alias = "input_tokens")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, alias = "output_tokens")]
    pub completion_tokens: Option<u64>,
}

/// The extracted reply of a completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReply {
    pub content: String,
    /// Model reported by the endpoint (falls back to the requested model)
    pub model: String,
    pub usage: Option<TokenUsage>,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, CallError>;
}

// Response shape of `/chat/completions`; only the fields we read.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Calls an OpenAI-compatible chat-completion endpoint over HTTP.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(300)) // 5 min timeout
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, CallError> {
        let url = self.endpoint();

        tracing::info!(
            "[AgentCaller] Calling chat completions: {} (model: {})",
            url,
            request.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_reply(&body, &request.model)
    }
}

fn parse_reply(body: &str, requested_model: &str) -> Result<CompletionReply, CallError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| CallError::Malformed(e.to_string()))?;

    let choice = parsed.choices.into_iter().next().ok_or(CallError::NoChoices)?;
    let content = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(CallError::EmptyReply)?;

    if let Some(ref usage) = parsed.usage {
        tracing::debug!(
            "[AgentCaller] Tokens: {:?} in / {:?} out",
            usage.prompt_tokens,
            usage.completion_tokens
        );
    }

    Ok(CompletionReply {
        content,
        model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
        usage: parsed.usage,
    })
}
