//! OI-VSCode adapter. Plain non-streaming OpenAI JSON served from a set of
//! mirrored endpoints of uneven reliability, so completion runs sequential
//! failover over a shuffled mirror list.

use std::time::Duration;

use async_trait::async_trait;
use rand::distr::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde_json::{json, Value};

use super::types::{
    text_or_placeholder, CompletionRequest, NormalizedCompletion, Provider, ProviderError,
};

const PROVIDER_NAME: &str = "oivscode";
const MODELS: &[&str] = &[
    "gpt-4",
    "gpt-4-turbo",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-16k",
    "o1",
    "o1-mini",
    "o1-preview",
    "o3-mini",
];

pub struct OivscodeConfig {
    pub endpoints: Vec<String>,
}

impl Default for OivscodeConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                "https://oi-vscode-server.onrender.com/v1/chat/completions".to_string(),
                "https://oi-vscode-server-2.onrender.com/v1/chat/completions".to_string(),
                "https://oi-vscode-server-5.onrender.com/v1/chat/completions".to_string(),
                "https://oi-vscode-server-0501.onrender.com/v1/chat/completions".to_string(),
            ],
        }
    }
}

pub struct OivscodeProvider {
    cfg: OivscodeConfig,
    client: Client,
}

impl OivscodeProvider {
    pub fn new(cfg: OivscodeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self { cfg, client }
    }

    async fn try_endpoint(
        &self,
        endpoint: &str,
        userid: &str,
        payload: &Value,
    ) -> Result<NormalizedCompletion, ProviderError> {
        let response = self
            .client
            .post(endpoint)
            .header("userid", userid)
            .json(payload)
            .send()
            .await
            .map_err(|err| upstream(format!("request failed: {}", err)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(upstream(format!("status {}", status.as_u16())));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|err| upstream(format!("invalid json: {}", err)))?;

        let choice = data
            .get("choices")
            .and_then(|choices| choices.get(0))
            .ok_or_else(|| upstream("no choices in response".to_string()))?;
        let content = choice
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        // the one upstream that reports usage, so prefer it over estimation
        let usage = data.get("usage");
        Ok(NormalizedCompletion {
            text: text_or_placeholder(content),
            prompt_tokens: usage_field(usage, "prompt_tokens"),
            completion_tokens: usage_field(usage, "completion_tokens"),
        })
    }
}

#[async_trait]
impl Provider for OivscodeProvider {
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
        let userid: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(21)
            .map(char::from)
            .collect();
        let payload = json!({
            "model": request.model,
            "messages": request.messages,
            "stream": false,
        });

        let mut endpoints = self.cfg.endpoints.clone();
        endpoints.shuffle(&mut rand::rng());

        for endpoint in &endpoints {
            match self.try_endpoint(endpoint, &userid, &payload).await {
                Ok(normalized) => return Ok(normalized),
                Err(err) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %err,
                        "oivscode mirror failed, trying next"
                    );
                }
            }
        }

        Err(ProviderError::AllEndpointsFailed {
            provider: PROVIDER_NAME,
        })
    }
}

fn usage_field(usage: Option<&Value>, field: &str) -> u32 {
    usage
        .and_then(|u| u.get(field))
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32
}

fn upstream(reason: String) -> ProviderError {
    ProviderError::Upstream {
        provider: PROVIDER_NAME,
        reason,
    }
}
