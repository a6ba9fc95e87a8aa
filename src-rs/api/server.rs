use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::handlers::{
    handle_chat_completions, handle_health, handle_models, handle_root, AppState,
};
use crate::providers::registry::ModelRegistry;

pub struct GatewayServer {
    pub port: u16,
    state: Arc<AppState>,
}

impl GatewayServer {
    pub fn new(port: u16, registry: ModelRegistry) -> Self {
        Self {
            port,
            state: Arc::new(AppState { registry }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handle_root))
            .route("/health", get(handle_health))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .with_state(self.state.clone())
    }

    pub async fn start(&self) -> Result<(), String> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        axum::Server::bind(&addr)
            .serve(self.router().into_make_service())
            .await
            .map_err(|err| err.to_string())
    }
}
