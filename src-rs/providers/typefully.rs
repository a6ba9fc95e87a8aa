//! Typefully adapter. The upstream is a browser tool endpoint that answers
//! with a chunked token stream of `0:"..."` fragments rather than SSE.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::extract::typefully_token;
use super::types::{
    prompt_word_count, text_or_placeholder, word_count, ChatMessage, CompletionRequest,
    NormalizedCompletion, Provider, ProviderError, Role,
};

const PROVIDER_NAME: &str = "typefully";
const MODELS: &[&str] = &["claude-3.5-haiku"];
// the one exposed model maps to this upstream identifier
const UPSTREAM_MODEL: &str = "anthropic:claude-3-5-haiku-20241022";

const DEFAULT_SYSTEM_PROMPT: &str = "You're a helpful assistant.";

pub struct TypefullyConfig {
    pub api_url: String,
}

impl Default for TypefullyConfig {
    fn default() -> Self {
        Self {
            api_url: "https://typefully.com/tools/ai/api/completion".to_string(),
        }
    }
}

pub struct TypefullyProvider {
    cfg: TypefullyConfig,
    client: Client,
}

impl TypefullyProvider {
    pub fn new(cfg: TypefullyConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self { cfg, client }
    }
}

#[async_trait]
impl Provider for TypefullyProvider {
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
        let (prompt, system_prompt) = build_prompt(&request.messages);

        let payload = json!({
            "prompt": prompt,
            "systemPrompt": system_prompt,
            "modelIdentifier": UPSTREAM_MODEL,
            "outputLength": request.max_tokens,
        });

        let response = self
            .client
            .post(&self.cfg.api_url)
            .header("accept", "*/*")
            .header("origin", "https://typefully.com")
            .header("referer", "https://typefully.com/tools/ai/chat-gpt-alternative")
            .json(&payload)
            .send()
            .await
            .map_err(|err| upstream(format!("Typefully request failed: {}", err)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream(format!(
                "Typefully API error: {} - {}",
                status.as_u16(),
                body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| upstream(format!("Typefully read failed: {}", err)))?;

        let mut text = String::new();
        for line in body.lines() {
            if !line.trim().is_empty() {
                text.push_str(&typefully_token(line));
            }
        }

        let completion_tokens = word_count(&text);
        Ok(NormalizedCompletion {
            text: text_or_placeholder(text),
            prompt_tokens: prompt_word_count(&request.messages),
            completion_tokens,
        })
    }
}

fn upstream(reason: String) -> ProviderError {
    ProviderError::Upstream {
        provider: PROVIDER_NAME,
        reason,
    }
}

/// Flatten the conversation into the upstream's (prompt, system prompt) pair.
/// The upstream is effectively single-turn, so when the transcript carries
/// history only the latest user message is sent.
fn build_prompt(messages: &[ChatMessage]) -> (String, String) {
    let mut system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
    let mut conversation = String::new();

    for msg in messages {
        match msg.role {
            Role::System => system_prompt = msg.content.clone(),
            Role::User => {
                conversation.push_str("User: ");
                conversation.push_str(&msg.content);
                conversation.push('\n');
            }
            Role::Assistant => {
                conversation.push_str("Assistant: ");
                conversation.push_str(&msg.content);
                conversation.push('\n');
            }
        }
    }

    let mut prompt = conversation.trim().to_string();
    if let Some(last) = messages.last() {
        if last.role == Role::User {
            prompt = last.content.clone();
        }
    }
    (prompt, system_prompt)
}
