use omegatron_rs::api::server::GatewayServer;
use omegatron_rs::{build_registry, GatewayConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = GatewayConfig::from_env();
    let registry = build_registry(&cfg);
    tracing::info!(
        port = cfg.port,
        models = registry.model_count(),
        "omegatron listening"
    );

    let server = GatewayServer::new(cfg.port, registry);
    if let Err(err) = server.start().await {
        eprintln!("server error: {}", err);
        std::process::exit(1);
    }
}
