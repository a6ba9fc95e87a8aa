use std::io::{BufRead, BufReader};

use reqwest::blocking::Client;

use crate::models::{ChatRequest, ChatResponse};

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("reqwest client"),
        }
    }

    pub fn list_models(&self) -> Result<Vec<String>, String> {
        let url = format!("{}/v1/models", self.base_url.trim_end_matches('/'));
        let resp = self.client.get(url).send().map_err(|err| err.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("http {}", resp.status().as_u16()));
        }
        let value = resp
            .json::<serde_json::Value>()
            .map_err(|err| err.to_string())?;
        let models = value
            .get("data")
            .and_then(|data| data.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("id").and_then(|id| id.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(models)
    }

    pub fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, String> {
        let resp = self
            .client
            .post(self.chat_url())
            .json(req)
            .send()
            .map_err(|err| err.to_string())?;
        if resp.status().is_success() {
            resp.json::<ChatResponse>().map_err(|err| err.to_string())
        } else {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            Err(format!("http {}: {}", status.as_u16(), body))
        }
    }

    /// Streamed chat. Calls `on_delta` for every content fragment as it
    /// arrives and returns the assembled answer.
    pub fn chat_stream(
        &self,
        req: &ChatRequest,
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<String, String> {
        let resp = self
            .client
            .post(self.chat_url())
            .json(req)
            .send()
            .map_err(|err| err.to_string())?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(format!("http {}: {}", status.as_u16(), body));
        }

        let mut answer = String::new();
        let reader = BufReader::new(resp);
        for line in reader.lines() {
            let line = line.map_err(|err| err.to_string())?;
            let data = match line.strip_prefix("data: ") {
                Some(data) => data,
                None => continue,
            };
            if data == "[DONE]" {
                break;
            }
            let value: serde_json::Value = match serde_json::from_str(data) {
                Ok(value) => value,
                Err(_) => continue,
            };
            if let Some(delta) = value["choices"][0]["delta"]["content"].as_str() {
                on_delta(delta);
                answer.push_str(delta);
            }
        }
        Ok(answer)
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}
