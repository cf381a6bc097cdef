#![allow(dead_code)]

use std::sync::Arc;

use ai_client::{ChatClient, ChatClientConfig};
use audit_store::{AuditSink, MemoryAuditSink};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use gateway::app::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHAT_PATH: &str = "/v1/chat/completions";

pub struct TestContext {
    pub upstream: MockServer,
    pub audit: Arc<MemoryAuditSink>,
    pub app: axum::Router,
}

pub async fn build_test_context() -> TestContext {
    build_with_audit(MemoryAuditSink::new()).await
}

pub async fn build_with_audit(audit: MemoryAuditSink) -> TestContext {
    let upstream = MockServer::start().await;
    let audit = Arc::new(audit);
    let sink: Arc<dyn AuditSink> = audit.clone();
    let app = build_router(AppState::new(Arc::new(chat_client(&upstream)), sink));
    TestContext {
        upstream,
        audit,
        app,
    }
}

/// Router wired to an arbitrary audit sink; returns the upstream mock too.
pub async fn build_with_sink(sink: Arc<dyn AuditSink>) -> (MockServer, axum::Router) {
    let upstream = MockServer::start().await;
    let app = build_router(AppState::new(Arc::new(chat_client(&upstream)), sink));
    (upstream, app)
}

pub fn chat_client(upstream: &MockServer) -> ChatClient {
    ChatClient::new(ChatClientConfig {
        base_url: upstream.uri(),
        chat_path: CHAT_PATH.to_string(),
        model: "test-model".to_string(),
        api_key: "test-key".to_string(),
        temperature: None,
        timeout: None,
    })
    .expect("chat client should build")
}

pub fn completion(content: &str) -> Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

/// Upstream answers every chat call with `content`.
pub async fn reply_with(ctx: &TestContext, content: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(&ctx.upstream)
        .await;
}

pub async fn fail_with(ctx: &TestContext, status: u16) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
        .mount(&ctx.upstream)
        .await;
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    let req_body = body.map(|value| value.to_string()).unwrap_or_default();
    let req = builder
        .body(Body::from(req_body))
        .expect("request should build");
    send(app, req).await.0
}

pub async fn send(app: &axum::Router, req: Request<Body>) -> ((StatusCode, Value), axum::http::HeaderMap) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    ((status, json), headers)
}
