use ai_client::ChatError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use protocol::ErrorBody;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again shortly.";
pub const UNAVAILABLE_MESSAGE: &str = "AI service temporarily unavailable. Please try again later.";

/// Error returned from a handler, rendered as `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Maps an upstream failure. `generic` is shown for anything that is
    /// not a quota or availability problem.
    pub fn upstream(err: &ChatError, generic: &str) -> Self {
        match err {
            ChatError::RateLimited => Self {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: RATE_LIMIT_MESSAGE.to_string(),
            },
            ChatError::PaymentRequired => Self {
                status: StatusCode::PAYMENT_REQUIRED,
                message: UNAVAILABLE_MESSAGE.to_string(),
            },
            ChatError::ServiceUnavailable => Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: UNAVAILABLE_MESSAGE.to_string(),
            },
            ChatError::Upstream { .. }
            | ChatError::Transport(_)
            | ChatError::MalformedResponse(_)
            | ChatError::Config(_) => Self::internal(generic),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}
