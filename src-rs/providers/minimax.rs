//! MiniMax adapter. The upstream speaks standard OpenAI-style SSE with an
//! extra `reasoning_content` delta channel for its reasoning model.

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};

use super::types::{
    prompt_word_count, text_or_placeholder, word_count, CompletionRequest, NormalizedCompletion,
    Provider, ProviderError,
};

const PROVIDER_NAME: &str = "minimax";
const MODELS: &[&str] = &["minimax-reasoning-01"];

pub struct MinimaxConfig {
    pub api_url: String,
    pub api_key: String,
}

pub struct MinimaxProvider {
    cfg: MinimaxConfig,
    client: Client,
}

impl MinimaxProvider {
    pub fn new(cfg: MinimaxConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self { cfg, client }
    }
}

#[async_trait]
impl Provider for MinimaxProvider {
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
        let payload = json!({
            "model": request.model,
            "messages": request.messages,
            "stream": true,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "top_p": 0.95,
        });

        let response = self
            .client
            .post(&self.cfg.api_url)
            .bearer_auth(&self.cfg.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    upstream("MiniMax API timed out".to_string())
                } else {
                    upstream(format!("MiniMax API request failed: {}", err))
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(upstream(format!("MiniMax API error: {}", status.as_u16())));
        }

        let mut answer = String::new();
        let mut thinking = String::new();
        let mut events = response.bytes_stream().eventsource();

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(EventStreamError::Transport(err)) => {
                    if err.is_timeout() {
                        return Err(upstream("MiniMax API timed out".to_string()));
                    }
                    return Err(upstream(format!("MiniMax stream failed: {}", err)));
                }
                // skip undecodable frames, the stream itself is still alive
                Err(_) => continue,
            };
            if event.data.trim() == "[DONE]" {
                break;
            }
            let value: Value = match serde_json::from_str(&event.data) {
                Ok(value) => value,
                Err(_) => continue, // malformed JSON line, skip it
            };
            let (content, reasoning) = delta_fragments(&value);
            if let Some(content) = content {
                answer.push_str(content);
            }
            if let Some(reasoning) = reasoning {
                thinking.push_str(reasoning);
            }
        }

        let completion_tokens = word_count(&answer);
        let answer = text_or_placeholder(answer);
        let text = if thinking.is_empty() {
            answer
        } else {
            format!("<thinking>\n{}\n</thinking>\n\n{}", thinking, answer)
        };

        Ok(NormalizedCompletion {
            text,
            prompt_tokens: prompt_word_count(&request.messages),
            completion_tokens,
        })
    }
}

/// Content and reasoning fragments of one SSE event payload.
fn delta_fragments(value: &Value) -> (Option<&str>, Option<&str>) {
    let delta = value
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("delta"));
    let content = delta
        .and_then(|d| d.get("content"))
        .and_then(Value::as_str);
    let reasoning = delta
        .and_then(|d| d.get("reasoning_content"))
        .and_then(Value::as_str);
    (content, reasoning)
}

fn upstream(reason: String) -> ProviderError {
    ProviderError::Upstream {
        provider: PROVIDER_NAME,
        reason,
    }
}
