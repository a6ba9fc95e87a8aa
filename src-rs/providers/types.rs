use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn assistant(content: String) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }
}

/// OpenAI-style chat completion request. Only `model` is validated; the
/// remaining fields pass through to the owning provider with these defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    1.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

/// Canonical shape every provider produces before the dispatcher wraps it
/// into an OpenAI-compatible response or a synthetic stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedCompletion {
    pub text: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl NormalizedCompletion {
    pub fn into_response(self, model: &str) -> ChatCompletionResponse {
        ChatCompletionResponse {
            id: completion_id(),
            object: "chat.completion".to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model.to_string(),
            choices: vec![Choice {
                index: 0,
                message: ChatMessage::assistant(self.text),
                finish_reason: "stop".to_string(),
            }],
            usage: Usage {
                prompt_tokens: self.prompt_tokens,
                completion_tokens: self.completion_tokens,
                total_tokens: self.prompt_tokens + self.completion_tokens,
            },
        }
    }
}

pub fn completion_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4().simple())
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Model '{model}' not found. Available models: {available:?}")]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },

    #[error("No provider found for model: {model}")]
    ProviderMissing { model: String },

    #[error("{reason}")]
    Upstream {
        provider: &'static str,
        reason: String,
    },

    #[error("All {provider} endpoints failed")]
    AllEndpointsFailed { provider: &'static str },
}

/// One upstream chat service hidden behind the common capability set.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    fn models(&self) -> Vec<String>;

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<NormalizedCompletion, ProviderError>;
}

/// Substituted when an upstream yields no extractable text.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response generated";

pub fn text_or_placeholder(text: String) -> String {
    if text.is_empty() {
        NO_RESPONSE_PLACEHOLDER.to_string()
    } else {
        text
    }
}

/// Upstream usage reporting is unreliable across these services, so token
/// counts are estimated as whitespace-delimited word counts.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

pub fn prompt_word_count(messages: &[ChatMessage]) -> u32 {
    messages.iter().map(|msg| word_count(&msg.content)).sum()
}
