use std::net::SocketAddr;
use std::sync::Arc;

use omegatron_rs::api::server::GatewayServer;
use omegatron_rs::providers::{
    FlowithConfig, FlowithProvider, MinimaxConfig, MinimaxProvider, ModelRegistry,
    OivscodeConfig, OivscodeProvider, TypefullyConfig, TypefullyProvider,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_gateway(registry: ModelRegistry) -> SocketAddr {
    let server = GatewayServer::new(0, registry);
    let app = server.router();
    let bound = axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(app.into_make_service());
    let addr = bound.local_addr();
    tokio::spawn(bound);
    addr
}

fn chat_body(model: &str, stream: bool) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": "hi there"}],
        "stream": stream,
    })
}

fn default_registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry.register(
        "flowith",
        Arc::new(FlowithProvider::new(FlowithConfig::default())),
    );
    registry.register(
        "oivscode",
        Arc::new(OivscodeProvider::new(OivscodeConfig::default())),
    );
    registry
}

#[tokio::test]
async fn unknown_model_returns_400_with_sorted_catalog() {
    let addr = spawn_gateway(default_registry()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&chat_body("no-such-model", false))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Model 'no-such-model' not found"));
    assert!(detail.contains("not found"));
    // catalog in the message is sorted, deepseek-chat precedes gpt-4
    let deepseek = detail.find("deepseek-chat").unwrap();
    let gpt4 = detail.find("\"gpt-4\"").unwrap();
    assert!(deepseek < gpt4);
}

#[tokio::test]
async fn mirrored_endpoints_fail_over_to_a_healthy_mirror() {
    let bad1 = MockServer::start().await;
    let bad2 = MockServer::start().await;
    let good = MockServer::start().await;

    for server in [&bad1, &bad2] {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "mirror answer"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
        })))
        .mount(&good)
        .await;

    let endpoints = vec![
        format!("{}/v1/chat/completions", bad1.uri()),
        format!("{}/v1/chat/completions", bad2.uri()),
        format!("{}/v1/chat/completions", good.uri()),
    ];
    let mut registry = ModelRegistry::new();
    registry.register(
        "oivscode",
        Arc::new(OivscodeProvider::new(OivscodeConfig { endpoints })),
    );
    let addr = spawn_gateway(registry).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&chat_body("gpt-4o", false))
        .send()
        .await
        .unwrap();

    // earlier mirror failures never surface to the caller
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["choices"][0]["message"]["content"], "mirror answer");
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
    assert_eq!(body["usage"]["prompt_tokens"], 9);
    assert_eq!(body["usage"]["completion_tokens"], 12);
}

#[tokio::test]
async fn exhausted_mirrors_return_500() {
    let bad = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&bad)
        .await;

    let endpoints = vec![
        format!("{}/v1/chat/completions", bad.uri()),
        format!("{}/unreachable", bad.uri()),
    ];
    let mut registry = ModelRegistry::new();
    registry.register(
        "oivscode",
        Arc::new(OivscodeProvider::new(OivscodeConfig { endpoints })),
    );
    let addr = spawn_gateway(registry).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&chat_body("gpt-4o", false))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error generating response:"));
    assert!(detail.contains("All oivscode endpoints failed"));
}

#[tokio::test]
async fn flowith_answer_is_normalized_with_estimated_usage() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("Hello from the edge", "text/plain"),
        )
        .mount(&upstream)
        .await;

    let mut registry = ModelRegistry::new();
    registry.register(
        "flowith",
        Arc::new(FlowithProvider::new(FlowithConfig {
            api_url: format!("{}/ai/chat?mode=general", upstream.uri()),
        })),
    );
    let addr = spawn_gateway(registry).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&chat_body("kimi-k2", false))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["choices"][0]["message"]["content"], "Hello from the edge");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");
    // whitespace-word estimates: "hi there" -> 2, "Hello from the edge" -> 4
    assert_eq!(body["usage"]["prompt_tokens"], 2);
    assert_eq!(body["usage"]["completion_tokens"], 4);
    assert_eq!(body["usage"]["total_tokens"], 6);
}

#[tokio::test]
async fn typefully_token_stream_is_reassembled() {
    let upstream = MockServer::start().await;
    let raw = "0:\"Hello\"\n0:\" world\"\ne:{\"finishReason\":\"stop\"}\n";
    Mock::given(method("POST"))
        .and(path("/tools/ai/api/completion"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "text/plain"))
        .mount(&upstream)
        .await;

    let mut registry = ModelRegistry::new();
    registry.register(
        "typefully",
        Arc::new(TypefullyProvider::new(TypefullyConfig {
            api_url: format!("{}/tools/ai/api/completion", upstream.uri()),
        })),
    );
    let addr = spawn_gateway(registry).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&chat_body("claude-3.5-haiku", false))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["choices"][0]["message"]["content"], "Hello world");
}

#[tokio::test]
async fn minimax_sse_stream_is_collected_and_restreamed() {
    let upstream = MockServer::start().await;
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Deep\",\"reasoning_content\":\"pondering\"}}]}\n\n",
        "data: this-is-not-json\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" thought\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/text/chatcompletion_v2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&upstream)
        .await;

    let mut registry = ModelRegistry::new();
    registry.register(
        "minimax",
        Arc::new(MinimaxProvider::new(MinimaxConfig {
            api_url: format!("{}/v1/text/chatcompletion_v2", upstream.uri()),
            api_key: "test-key".to_string(),
        })),
    );
    let addr = spawn_gateway(registry).await;
    let client = reqwest::Client::new();

    // non-streaming: reasoning is wrapped into a thinking block
    let resp = client
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&chat_body("minimax-reasoning-01", false))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let content = body["choices"][0]["message"]["content"].as_str().unwrap();
    assert_eq!(content, "<thinking>\npondering\n</thinking>\n\nDeep thought");

    // streaming: the buffered answer is replayed as chunk frames
    let resp = client
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&chat_body("minimax-reasoning-01", true))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let text = resp.text().await.unwrap();
    assert!(text.starts_with("data: "));
    assert!(text.ends_with("data: [DONE]\n\n"));

    let frames: Vec<&str> = text
        .split("\n\n")
        .filter(|frame| !frame.is_empty())
        .collect();
    let first: Value =
        serde_json::from_str(frames[0].strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(first["object"], "chat.completion.chunk");
    assert!(first["choices"][0]["delta"]["content"]
        .as_str()
        .unwrap()
        .starts_with("<thinking>"));
    let closing: Value = serde_json::from_str(
        frames[frames.len() - 2].strip_prefix("data: ").unwrap(),
    )
    .unwrap();
    assert_eq!(closing["choices"][0]["finish_reason"], "stop");
}

#[tokio::test]
async fn model_catalog_is_sorted_and_freshly_dated() {
    let addr = spawn_gateway(default_registry()).await;
    let resp = reqwest::get(format!("http://{}/v1/models", addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["object"], "list");

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 22); // 12 flowith + 10 oivscode
    let ids: Vec<&str> = data
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    for entry in data {
        assert_eq!(entry["object"], "model");
        assert_eq!(entry["owned_by"], "omegatron");
        assert_eq!(entry["endpoint"], "/v1/chat/completions");
        assert!(entry["created"].as_i64().unwrap() > 0);
    }
}

#[tokio::test]
async fn root_and_health_report_model_count() {
    let addr = spawn_gateway(default_registry()).await;
    let client = reqwest::Client::new();

    let root: Value = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["message"], "Omegatron AI API");
    assert_eq!(root["total_models"], 22);
    assert_eq!(root["endpoints"]["chat"], "/v1/chat/completions");

    let health: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "operational");
    assert_eq!(health["total_models"], 22);
}
