use std::io::{self, Write};

use crate::models::{CLIConfig, ChatMessage, Usage};

pub fn banner(cfg: &CLIConfig) {
    println!("Omegatron Debug CLI");
    println!("API: {}", cfg.base_url);
    println!(
        "Model: {}  Temp: {:.2}  Stream: {}",
        cfg.model, cfg.temperature, cfg.stream
    );
    println!("Type /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                 Show commands");
    println!("  /exit | /quit          Exit");
    println!("  /models                List gateway models");
    println!("  /model <name>          Set model");
    println!("  /system <prompt>       Set system prompt");
    println!("  /stream [on|off]       Toggle streamed responses");
    println!("  /temp <float>          Set temperature");
    println!("  /base <url>            Update base URL");
    println!("  /history               Show chat history");
    println!("  /reset                 Clear chat history");
    println!("  /config                Show current config");
}

pub fn response(content: &str, usage: Option<&Usage>) {
    println!("assistant> {}", content);
    if let Some(usage) = usage {
        println!(
            "usage: prompt={} completion={} total={}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }
}

pub fn stream_start() {
    print!("assistant> ");
    let _ = io::stdout().flush();
}

pub fn stream_delta(delta: &str) {
    print!("{}", delta);
    let _ = io::stdout().flush();
}

pub fn stream_end() {
    println!();
}

pub fn models(models: &[String]) {
    if models.is_empty() {
        println!("no models");
        return;
    }
    for model in models {
        println!("  {}", model);
    }
    println!("{} models", models.len());
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  model: {}", cfg.model);
    println!("  temp: {:.2}", cfg.temperature);
    println!("  stream: {}", cfg.stream);
    println!("  max_tokens: {}", cfg.max_tokens);
    if let Some(system) = &cfg.system_prompt {
        println!("  system: {}", system);
    }
}

pub fn history(items: &[ChatMessage]) {
    if items.is_empty() {
        println!("no history");
        return;
    }
    for msg in items {
        println!("{}> {}", msg.role, msg.content);
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
