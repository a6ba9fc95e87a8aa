use std::env;

/// Gateway configuration. Upstream endpoints default to the public URLs;
/// credential material only ever comes from the environment.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub port: u16,
    pub flowith_api_url: String,
    pub cloudflare_api_url: String,
    pub typefully_api_url: String,
    pub minimax_api_url: String,
    pub minimax_api_key: Option<String>,
    pub oivscode_endpoints: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            flowith_api_url: "https://edge.flowith.net/ai/chat?mode=general".to_string(),
            cloudflare_api_url: "https://playground.ai.cloudflare.com/api/inference".to_string(),
            typefully_api_url: "https://typefully.com/tools/ai/api/completion".to_string(),
            minimax_api_url: "https://api.minimaxi.chat/v1/text/chatcompletion_v2".to_string(),
            minimax_api_key: None,
            oivscode_endpoints: vec![
                "https://oi-vscode-server.onrender.com/v1/chat/completions".to_string(),
                "https://oi-vscode-server-2.onrender.com/v1/chat/completions".to_string(),
                "https://oi-vscode-server-5.onrender.com/v1/chat/completions".to_string(),
                "https://oi-vscode-server-0501.onrender.com/v1/chat/completions".to_string(),
            ],
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(port) = env_opt("OMEGATRON_PORT").or_else(|| env_opt("PORT")) {
            if let Ok(parsed) = port.parse::<u16>() {
                cfg.port = parsed;
            }
        }
        cfg.flowith_api_url = env_or("OMEGATRON_FLOWITH_URL", cfg.flowith_api_url);
        cfg.cloudflare_api_url = env_or("OMEGATRON_CLOUDFLARE_URL", cfg.cloudflare_api_url);
        cfg.typefully_api_url = env_or("OMEGATRON_TYPEFULLY_URL", cfg.typefully_api_url);
        cfg.minimax_api_url = env_or("OMEGATRON_MINIMAX_URL", cfg.minimax_api_url);
        cfg.minimax_api_key = env_opt("MINIMAX_API_KEY");
        if let Some(raw) = env_opt("OMEGATRON_OIVSCODE_ENDPOINTS") {
            let endpoints: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            if !endpoints.is_empty() {
                cfg.oivscode_endpoints = endpoints;
            }
        }
        cfg
    }
}

fn env_or(key: &str, fallback: String) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(fallback)
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
