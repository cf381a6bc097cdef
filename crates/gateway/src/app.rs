use std::sync::Arc;
use std::time::Instant;

use ai_client::{ChatClient, ChatCompletion};
use anyhow::Context;
use audit_store::{AuditSink, DisabledAuditSink, JsonlAuditSink, RestAuditSink};
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::config::{AuditSettings, GatewaySettings};
use crate::handlers;

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatCompletion>,
    pub audit: Arc<dyn AuditSink>,
    pub allow_origin: HeaderValue,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatCompletion>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            chat,
            audit,
            allow_origin: HeaderValue::from_static("*"),
        }
    }
}

pub fn build_state(settings: &GatewaySettings) -> anyhow::Result<AppState> {
    let chat = ChatClient::new(settings.chat.clone()).context("failed to build chat client")?;
    let audit: Arc<dyn AuditSink> = match &settings.audit {
        AuditSettings::Disabled => Arc::new(DisabledAuditSink),
        AuditSettings::Jsonl(path) => Arc::new(JsonlAuditSink::new(path.clone())),
        AuditSettings::Rest {
            base_url,
            table,
            api_key,
            timeout,
        } => Arc::new(RestAuditSink::new(base_url, table, api_key.clone(), *timeout)?),
    };
    tracing::info!(
        upstream = %chat.url(),
        model = %settings.chat.model,
        audit = audit.name(),
        "gateway state ready"
    );
    Ok(AppState {
        chat: Arc::new(chat),
        audit,
        allow_origin: settings.allow_origin.clone(),
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(handlers::analyze))
        .route("/scam-detection", post(handlers::analyze))
        .route("/tutor", post(handlers::tutor))
        .route("/ai-tutor", post(handlers::tutor))
        .layer(middleware::from_fn_with_state(state.clone(), apply_cors))
        .layer(middleware::from_fn(log_http_request))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Answers preflight requests directly and stamps CORS headers on every
/// other response.
async fn apply_cors(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, state.allow_origin.clone());
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "http request"
    );
    response
}
