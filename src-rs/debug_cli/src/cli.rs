use std::env;

use crate::models::CLIConfig;

const DEFAULT_URL: &str = "http://localhost:8000";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub fn parse_config() -> CLIConfig {
    let mut cfg = CLIConfig {
        base_url: env_or("OMEGATRON_URL", DEFAULT_URL.to_string()),
        model: env_or("OMEGATRON_MODEL", DEFAULT_MODEL.to_string()),
        system_prompt: env_opt("OMEGATRON_SYSTEM_PROMPT"),
        stream: env_bool("OMEGATRON_STREAM", false),
        temperature: env_float("OMEGATRON_TEMPERATURE", 0.7),
        max_tokens: 2048,
    };

    let args: Vec<String> = env::args().collect();
    let mut idx = 1;
    while idx < args.len() {
        match args[idx].as_str() {
            "--base" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.base_url = value.clone();
                    idx += 1;
                }
            }
            "--model" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.model = value.clone();
                    idx += 1;
                }
            }
            "--system" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.system_prompt = Some(value.clone());
                    idx += 1;
                }
            }
            "--temp" => {
                if let Some(value) = args.get(idx + 1) {
                    if let Ok(parsed) = value.parse::<f64>() {
                        cfg.temperature = parsed;
                    }
                    idx += 1;
                }
            }
            "--max-tokens" => {
                if let Some(value) = args.get(idx + 1) {
                    if let Ok(parsed) = value.parse::<u32>() {
                        cfg.max_tokens = parsed;
                    }
                    idx += 1;
                }
            }
            "--stream" => {
                cfg.stream = true;
            }
            _ => {}
        }
        idx += 1;
    }

    cfg
}

fn env_or(key: &str, fallback: String) -> String {
    env::var(key).unwrap_or(fallback)
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn env_bool(key: &str, fallback: bool) -> bool {
    match env::var(key) {
        Ok(value) => value.parse::<bool>().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_float(key: &str, fallback: f64) -> f64 {
    match env::var(key) {
        Ok(value) => value.parse::<f64>().unwrap_or(fallback),
        Err(_) => fallback,
    }
}
