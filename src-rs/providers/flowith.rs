//! Flowith adapter. The upstream streams its answer as raw text chunks with
//! no framing, so normalization is just concatenating the body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use super::types::{
    prompt_word_count, text_or_placeholder, word_count, ChatMessage, CompletionRequest,
    NormalizedCompletion, Provider, ProviderError, Role,
};

const PROVIDER_NAME: &str = "flowith";
const MODELS: &[&str] = &[
    "gpt-5-nano",
    "gpt-5-mini",
    "glm-4.5",
    "gpt-oss-120b",
    "gpt-oss-20b",
    "kimi-k2",
    "gpt-4.1",
    "gpt-4.1-mini",
    "deepseek-chat",
    "deepseek-reasoner",
    "gemini-2.5-flash",
    "grok-3-mini",
];

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub struct FlowithConfig {
    pub api_url: String,
}

impl Default for FlowithConfig {
    fn default() -> Self {
        Self {
            api_url: "https://edge.flowith.net/ai/chat?mode=general".to_string(),
        }
    }
}

pub struct FlowithProvider {
    cfg: FlowithConfig,
    client: Client,
}

impl FlowithProvider {
    pub fn new(cfg: FlowithConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self { cfg, client }
    }
}

#[async_trait]
impl Provider for FlowithProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<NormalizedCompletion, ProviderError> {
        let mut user_message = None;
        let mut system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
        for msg in &request.messages {
            match msg.role {
                Role::User => user_message = Some(msg.content.clone()),
                Role::System => system_prompt = msg.content.clone(),
                Role::Assistant => {}
            }
        }
        let user_message =
            user_message.ok_or_else(|| upstream("No user message found".to_string()))?;

        let text = seek(
            &self.client,
            &self.cfg.api_url,
            &request.model,
            &system_prompt,
            &user_message,
            request.max_tokens,
        )
        .await?;

        let completion_tokens = word_count(&text);
        Ok(NormalizedCompletion {
            text: text_or_placeholder(text),
            prompt_tokens: prompt_word_count(&request.messages),
            completion_tokens,
        })
    }
}

/// One-shot upstream call with explicit parameters; the answer arrives as
/// unframed text chunks which are concatenated into a single string.
async fn seek(
    client: &Client,
    api_url: &str,
    model: &str,
    system_prompt: &str,
    user_message: &str,
    max_tokens: u32,
) -> Result<String, ProviderError> {
    let payload = json!({
        "model": model,
        "content": user_message,
        "systemPrompt": system_prompt,
        "maxTokens": max_tokens,
        "stream": true,
        "nodeId": Uuid::new_v4().to_string(),
    });

    let response = client
        .post(api_url)
        .header("accept", "*/*")
        .header("origin", "https://flowith.io")
        .json(&payload)
        .send()
        .await
        .map_err(|err| upstream(format!("Flowith request failed: {}", err)))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(upstream(format!(
            "Flowith API error: {}",
            status.as_u16()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| upstream(format!("Flowith read failed: {}", err)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn upstream(reason: String) -> ProviderError {
    ProviderError::Upstream {
        provider: PROVIDER_NAME,
        reason,
    }
}
