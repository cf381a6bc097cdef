//! Minimal chat-completion client for OpenAI-compatible gateways.

mod error;

use std::time::Duration;

use async_trait::async_trait;
use protocol::ChatTurn;
use reqwest::Client;
use serde_json::{json, Value};

pub use error::ChatError;

/// Sends a conversation upstream and returns the first choice's text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ChatError>;
}

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub chat_path: String,
    pub model: String,
    pub api_key: String,
    pub temperature: Option<f32>,
    pub timeout: Option<Duration>,
}

pub struct ChatClient {
    config: ChatClientConfig,
    url: String,
    http: Client,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, ChatError> {
        if config.api_key.trim().is_empty() {
            return Err(ChatError::Config("missing api key".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(ChatError::Config("missing model".to_string()));
        }
        let url = join_base_path(&config.base_url, &config.chat_path)?;
        Ok(Self {
            config,
            url,
            http: Client::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn payload(&self, turns: &[ChatTurn]) -> Value {
        let mut payload = json!({
            "model": self.config.model,
            "messages": turns,
        });
        if let Some(temperature) = self.config.temperature {
            payload["temperature"] = json!(temperature);
        }
        payload
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ChatError> {
        let mut request = self
            .http
            .post(&self.url)
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(turns));
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| {
            tracing::warn!(event = "upstream.request.failed", error = %err, "chat request failed");
            ChatError::Transport(err)
        })?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(
                event = "upstream.request.rejected",
                status = status.as_u16(),
                body = %body,
                "chat request returned error status"
            );
            return Err(ChatError::from_status(status.as_u16(), body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|err| ChatError::MalformedResponse(err.to_string()))?;
        Ok(completion_text(&value).to_string())
    }
}

/// First choice's message content, or the legacy `text` field. Empty when
/// neither is present.
fn completion_text(value: &Value) -> &str {
    value
        .pointer("/choices/0/message/content")
        .and_then(|val| val.as_str())
        .or_else(|| value.pointer("/choices/0/text").and_then(|val| val.as_str()))
        .unwrap_or("")
}

fn join_base_path(base: &str, path: &str) -> Result<String, ChatError> {
    if base.trim().is_empty() {
        return Err(ChatError::Config("base_url is empty".to_string()));
    }
    let normalized_base = base.trim().trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Ok(format!("{normalized_base}{normalized_path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> ChatClientConfig {
        ChatClientConfig {
            base_url,
            chat_path: "/v1/chat/completions".to_string(),
            model: "test-model".to_string(),
            api_key: "secret".to_string(),
            temperature: Some(0.2),
            timeout: None,
        }
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[test]
    fn join_base_path_normalizes_slashes() {
        assert_eq!(
            join_base_path("https://ai.example.com/", "v1/chat").unwrap(),
            "https://ai.example.com/v1/chat"
        );
        assert!(join_base_path("  ", "/v1").is_err());
    }

    #[test]
    fn new_rejects_missing_key() {
        let mut config = config("https://ai.example.com".to_string());
        config.api_key = " ".to_string();
        assert!(matches!(ChatClient::new(config), Err(ChatError::Config(_))));
    }

    #[test]
    fn completion_text_reads_legacy_field() {
        assert_eq!(completion_text(&json!({ "choices": [{ "text": "hi" }] })), "hi");
        assert_eq!(completion_text(&json!({ "choices": [] })), "");
    }

    #[tokio::test]
    async fn complete_sends_model_turns_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "messages": [{ "role": "system", "content": "be brief" }, { "role": "user", "content": "hi" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("hello")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(config(server.uri())).unwrap();
        let reply = client
            .complete(&[ChatTurn::system("be brief"), ChatTurn::user("hi")])
            .await
            .unwrap();
        assert_eq!(reply, "hello");
    }

    async fn error_for_status(status: u16) -> ChatError {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;
        let client = ChatClient::new(config(server.uri())).unwrap();
        client.complete(&[ChatTurn::user("hi")]).await.unwrap_err()
    }

    #[tokio::test]
    async fn complete_classifies_error_statuses() {
        assert!(matches!(error_for_status(429).await, ChatError::RateLimited));
        assert!(matches!(error_for_status(402).await, ChatError::PaymentRequired));
        assert!(matches!(error_for_status(503).await, ChatError::ServiceUnavailable));
        match error_for_status(500).await {
            ChatError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "nope");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_rejects_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;
        let client = ChatClient::new(config(server.uri())).unwrap();
        let err = client.complete(&[ChatTurn::user("hi")]).await.unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn complete_returns_empty_when_content_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;
        let client = ChatClient::new(config(server.uri())).unwrap();
        assert_eq!(client.complete(&[ChatTurn::user("hi")]).await.unwrap(), "");
    }
}
