//! Cloudflare playground adapter. Same `0:"..."` token-stream grammar as
//! Typefully but with its own terminator quirk, and a catalog of clean model
//! names mapped to the upstream `@cf/...` / `@hf/...` identifiers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use super::extract::cloudflare_token;
use super::types::{
    prompt_word_count, text_or_placeholder, word_count, CompletionRequest, NormalizedCompletion,
    Provider, ProviderError,
};

const PROVIDER_NAME: &str = "cloudflare";

// (exposed id, upstream identifier)
const MODEL_MAP: &[(&str, &str)] = &[
    ("deepseek-coder-6.7b-base-awq", "@hf/thebloke/deepseek-coder-6.7b-base-awq"),
    ("deepseek-coder-6.7b-instruct-awq", "@hf/thebloke/deepseek-coder-6.7b-instruct-awq"),
    ("deepseek-math-7b-instruct", "@cf/deepseek-ai/deepseek-math-7b-instruct"),
    ("deepseek-r1-distill-qwen-32b", "@cf/deepseek-ai/deepseek-r1-distill-qwen-32b"),
    ("discolm-german-7b-v1-awq", "@cf/thebloke/discolm-german-7b-v1-awq"),
    ("falcon-7b-instruct", "@cf/tiiuae/falcon-7b-instruct"),
    ("gemma-3-12b-it", "@cf/google/gemma-3-12b-it"),
    ("gemma-7b-it", "@hf/google/gemma-7b-it"),
    ("hermes-2-pro-mistral-7b", "@hf/nousresearch/hermes-2-pro-mistral-7b"),
    ("llama-2-13b-chat-awq", "@hf/thebloke/llama-2-13b-chat-awq"),
    ("llama-2-7b-chat-fp16", "@cf/meta/llama-2-7b-chat-fp16"),
    ("llama-2-7b-chat-int8", "@cf/meta/llama-2-7b-chat-int8"),
    ("llama-3-8b-instruct", "@cf/meta/llama-3-8b-instruct"),
    ("llama-3-8b-instruct-awq", "@cf/meta/llama-3-8b-instruct-awq"),
    ("llama-3.1-8b-instruct-awq", "@cf/meta/llama-3.1-8b-instruct-awq"),
    ("llama-3.1-8b-instruct-fp8", "@cf/meta/llama-3.1-8b-instruct-fp8"),
    ("llama-3.2-11b-vision-instruct", "@cf/meta/llama-3.2-11b-vision-instruct"),
    ("llama-3.2-1b-instruct", "@cf/meta/llama-3.2-1b-instruct"),
    ("llama-3.2-3b-instruct", "@cf/meta/llama-3.2-3b-instruct"),
    ("llama-3.3-70b-instruct-fp8-fast", "@cf/meta/llama-3.3-70b-instruct-fp8-fast"),
    ("llama-4-scout-17b-16e-instruct", "@cf/meta/llama-4-scout-17b-16e-instruct"),
    ("llama-guard-3-8b", "@cf/meta/llama-guard-3-8b"),
    ("llamaguard-7b-awq", "@hf/thebloke/llamaguard-7b-awq"),
    ("meta-llama-3-8b-instruct", "@hf/meta-llama/meta-llama-3-8b-instruct"),
    ("mistral-7b-instruct-v0.1", "@cf/mistral/mistral-7b-instruct-v0.1"),
    ("mistral-7b-instruct-v0.2", "@hf/mistral/mistral-7b-instruct-v0.2"),
    ("mistral-small-3.1-24b-instruct", "@cf/mistralai/mistral-small-3.1-24b-instruct"),
    ("neural-chat-7b-v3-1-awq", "@hf/thebloke/neural-chat-7b-v3-1-awq"),
    ("openchat-3.5-0106", "@cf/openchat/openchat-3.5-0106"),
    ("openhermes-2.5-mistral-7b-awq", "@hf/thebloke/openhermes-2.5-mistral-7b-awq"),
    ("phi-2", "@cf/microsoft/phi-2"),
    ("qwen1.5-0.5b-chat", "@cf/qwen/qwen1.5-0.5b-chat"),
    ("qwen1.5-1.8b-chat", "@cf/qwen/qwen1.5-1.8b-chat"),
    ("qwen1.5-14b-chat-awq", "@cf/qwen/qwen1.5-14b-chat-awq"),
    ("qwen1.5-7b-chat-awq", "@cf/qwen/qwen1.5-7b-chat-awq"),
    ("qwen2.5-coder-32b-instruct", "@cf/qwen/qwen2.5-coder-32b-instruct"),
    ("qwq-32b", "@cf/qwen/qwq-32b"),
    ("sqlcoder-7b-2", "@cf/defog/sqlcoder-7b-2"),
    ("starling-lm-7b-beta", "@hf/nexusflow/starling-lm-7b-beta"),
    ("tinyllama-1.1b-chat-v1.0", "@cf/tinyllama/tinyllama-1.1b-chat-v1.0"),
    ("una-cybertron-7b-v2-bf16", "@cf/fblgit/una-cybertron-7b-v2-bf16"),
    ("zephyr-7b-beta-awq", "@hf/thebloke/zephyr-7b-beta-awq"),
];

pub struct CloudflareConfig {
    pub api_url: String,
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            api_url: "https://playground.ai.cloudflare.com/api/inference".to_string(),
        }
    }
}

pub struct CloudflareProvider {
    cfg: CloudflareConfig,
    client: Client,
}

impl CloudflareProvider {
    pub fn new(cfg: CloudflareConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self { cfg, client }
    }
}

fn upstream_model(model: &str) -> String {
    MODEL_MAP
        .iter()
        .find(|(id, _)| *id == model)
        .map(|(_, cf)| cf.to_string())
        .unwrap_or_else(|| format!("@cf/{}", model))
}

#[async_trait]
impl Provider for CloudflareProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn models(&self) -> Vec<String> {
        MODEL_MAP.iter().map(|(id, _)| id.to_string()).collect()
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<NormalizedCompletion, ProviderError> {
        let payload = json!({
            "messages": request.messages,
            "lora": null,
            "model": upstream_model(&request.model),
            "max_tokens": request.max_tokens,
            "stream": true,
        });

        // the playground expects browser-ish cookie material, content is opaque
        let cookie = format!(
            "cfzs_amplitude={}; cfz_amplitude={}; __cf_bm={}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple(),
        );

        let response = self
            .client
            .post(&self.cfg.api_url)
            .header("accept", "text/event-stream")
            .header("origin", "https://playground.ai.cloudflare.com")
            .header("referer", "https://playground.ai.cloudflare.com/")
            .header("cookie", cookie)
            .json(&payload)
            .send()
            .await
            .map_err(|err| upstream(format!("Cloudflare request failed: {}", err)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(upstream(format!(
                "Cloudflare API error: {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| upstream(format!("Cloudflare read failed: {}", err)))?;

        let mut text = String::new();
        for line in body.lines() {
            if !line.trim().is_empty() {
                text.push_str(&cloudflare_token(line));
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
