use std::sync::Arc;

use axum::body::StreamBody;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::providers::registry::ModelRegistry;
use crate::providers::types::{CompletionRequest, ProviderError};
use crate::streaming;

pub struct AppState {
    pub registry: ModelRegistry,
}

pub async fn handle_root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Omegatron AI API",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": "omegatron",
        "endpoints": {
            "models": "/v1/models",
            "chat": "/v1/chat/completions",
            "endpoint": "/v1/chat/completions",
        },
        "total_models": state.registry.model_count(),
        "description": "Unified AI API with multiple model support",
    }))
}

pub async fn handle_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "provider": "omegatron",
        "total_models": state.registry.model_count(),
        "service": "operational",
    }))
}

pub async fn handle_models(State(state): State<Arc<AppState>>) -> Json<Value> {
    // `created` is regenerated per call, the catalog carries no stable dates
    let created = chrono::Utc::now().timestamp();
    let data: Vec<Value> = state
        .registry
        .sorted_models()
        .iter()
        .map(|model| {
            json!({
                "id": model,
                "object": "model",
                "created": created,
                "owned_by": "omegatron",
                "endpoint": "/v1/chat/completions",
            })
        })
        .collect();
    Json(json!({"object": "list", "data": data}))
}

pub async fn handle_chat_completions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompletionRequest>,
) -> Response {
    match dispatch(&state.registry, request).await {
        Ok(response) => response,
        Err(err) => error_response(&err),
    }
}

async fn dispatch(
    registry: &ModelRegistry,
    request: CompletionRequest,
) -> Result<Response, ProviderError> {
    let owner = registry
        .resolve(&request.model)
        .ok_or_else(|| ProviderError::ModelNotFound {
            model: request.model.clone(),
            available: registry.sorted_models(),
        })?;
    // unreachable unless the registry maps a model to an unregistered name
    let provider = registry
        .provider(owner)
        .ok_or_else(|| ProviderError::ProviderMissing {
            model: request.model.clone(),
        })?;

    tracing::debug!(
        model = %request.model,
        provider = %provider.name(),
        stream = request.stream,
        "dispatching completion"
    );
    let normalized = provider.complete(&request).await?;
    let response = normalized.into_response(&request.model);

    if request.stream {
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        let body = StreamBody::new(streaming::stream_completion(content, request.model));
        Ok(([(header::CONTENT_TYPE, "text/event-stream")], body).into_response())
    } else {
        Ok(Json(response).into_response())
    }
}

fn error_response(err: &ProviderError) -> Response {
    let status = match err {
        ProviderError::ModelNotFound { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let detail = match err {
        ProviderError::ModelNotFound { .. } | ProviderError::ProviderMissing { .. } => {
            err.to_string()
        }
        _ => format!("Error generating response: {}", err),
    };
    if status.is_server_error() {
        tracing::warn!(detail = %detail, "completion failed");
    }
    (status, Json(json!({"detail": detail}))).into_response()
}
