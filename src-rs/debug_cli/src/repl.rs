use std::io;

use crate::client::HTTPClient;
use crate::models::{CLIConfig, ChatMessage, ChatRequest};
use crate::render;

pub struct Repl {
    pub config: CLIConfig,
    pub client: HTTPClient,
    pub history: Vec<ChatMessage>,
}

impl Repl {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self {
            config,
            client,
            history: Vec::new(),
        }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            if io::stdin().read_line(&mut line).is_err() {
                break;
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.send(&line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "models" => match self.client.list_models() {
                Ok(models) => render::models(&models),
                Err(err) => render::error(&err),
            },
            "model" => {
                if rest.is_empty() {
                    render::info(&format!("model: {}", self.config.model));
                } else {
                    self.config.model = rest.to_string();
                    render::info("model updated");
                }
            }
            "system" => {
                if rest.is_empty() {
                    render::info(&format!("system prompt: {:?}", self.config.system_prompt));
                } else {
                    self.config.system_prompt = Some(rest.to_string());
                    render::info("system prompt updated");
                }
            }
            "stream" => {
                if rest.is_empty() {
                    self.config.stream = !self.config.stream;
                } else if let Some(flag) = parse_on_off(rest) {
                    self.config.stream = flag;
                } else {
                    render::error("invalid stream flag");
                    return false;
                }
                render::info(&format!("stream: {}", self.config.stream));
            }
            "temp" => {
                if rest.is_empty() {
                    render::info(&format!("temperature: {:.2}", self.config.temperature));
                } else if let Ok(val) = rest.parse::<f64>() {
                    self.config.temperature = val;
                    render::info("temperature updated");
                } else {
                    render::error("invalid temperature");
                }
            }
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    self.config.base_url = rest.to_string();
                    self.client = HTTPClient::new(&self.config.base_url);
                    render::info("base url updated");
                }
            }
            "history" => render::history(&self.history),
            "reset" => {
                self.history.clear();
                render::info("history cleared");
            }
            "config" => render::config(&self.config),
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn send(&mut self, line: &str) {
        self.history.push(ChatMessage {
            role: "user".to_string(),
            content: line.to_string(),
        });

        let mut messages = Vec::new();
        if let Some(system) = &self.config.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(self.history.iter().cloned());

        let req = ChatRequest {
            model: self.config.model.clone(),
            messages,
            stream: self.config.stream,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let answer = if self.config.stream {
            render::stream_start();
            let result = self
                .client
                .chat_stream(&req, &mut |delta| render::stream_delta(delta));
            render::stream_end();
            result
        } else {
            self.client.chat(&req).map(|resp| {
                let content = resp
                    .choices
                    .first()
                    .map(|choice| choice.message.content.clone())
                    .unwrap_or_default();
                render::response(&content, resp.usage.as_ref());
                content
            })
        };

        match answer {
            Ok(content) => {
                if !content.is_empty() {
                    self.history.push(ChatMessage {
                        role: "assistant".to_string(),
                        content,
                    });
                }
            }
            Err(err) => render::error(&err),
        }
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
