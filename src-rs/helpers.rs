use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::providers::{
    CloudflareConfig, CloudflareProvider, FlowithConfig, FlowithProvider, MinimaxConfig,
    MinimaxProvider, ModelRegistry, OivscodeConfig, OivscodeProvider, TypefullyConfig,
    TypefullyProvider,
};

/// Construct every configured provider and register it. Registration order is
/// fixed; a later provider claims any model id an earlier one also declares.
pub fn build_registry(cfg: &GatewayConfig) -> ModelRegistry {
    let mut registry = ModelRegistry::new();

    registry.register(
        "flowith",
        Arc::new(FlowithProvider::new(FlowithConfig {
            api_url: cfg.flowith_api_url.clone(),
        })),
    );

    registry.register(
        "cloudflare",
        Arc::new(CloudflareProvider::new(CloudflareConfig {
            api_url: cfg.cloudflare_api_url.clone(),
        })),
    );

    registry.register(
        "typefully",
        Arc::new(TypefullyProvider::new(TypefullyConfig {
            api_url: cfg.typefully_api_url.clone(),
        })),
    );

    match &cfg.minimax_api_key {
        Some(key) => registry.register(
            "minimax",
            Arc::new(MinimaxProvider::new(MinimaxConfig {
                api_url: cfg.minimax_api_url.clone(),
                api_key: key.clone(),
            })),
        ),
        None => tracing::warn!("MINIMAX_API_KEY not set, minimax provider disabled"),
    }

    registry.register(
        "oivscode",
        Arc::new(OivscodeProvider::new(OivscodeConfig {
            endpoints: cfg.oivscode_endpoints.clone(),
        })),
    );

    tracing::info!(
        providers = registry.provider_count(),
        models = registry.model_count(),
        "model registry built"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_all_configured_providers() {
        let cfg = GatewayConfig {
            minimax_api_key: Some("test-key".to_string()),
            ..GatewayConfig::default()
        };
        let registry = build_registry(&cfg);
        assert_eq!(registry.provider_count(), 5);
        assert_eq!(registry.resolve("claude-3.5-haiku"), Some("typefully"));
        assert_eq!(registry.resolve("minimax-reasoning-01"), Some("minimax"));
        assert_eq!(registry.resolve("gpt-4o"), Some("oivscode"));
        assert_eq!(registry.resolve("kimi-k2"), Some("flowith"));
        assert_eq!(registry.resolve("phi-2"), Some("cloudflare"));
    }

    #[test]
    fn minimax_is_skipped_without_a_key() {
        let cfg = GatewayConfig::default();
        let registry = build_registry(&cfg);
        assert_eq!(registry.provider_count(), 4);
        assert_eq!(registry.resolve("minimax-reasoning-01"), None);
    }
}
