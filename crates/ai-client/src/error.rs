use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("upstream rate limit exceeded")]
    RateLimited,
    #[error("upstream requires payment or quota")]
    PaymentRequired,
    #[error("upstream temporarily unavailable")]
    ServiceUnavailable,
    #[error("upstream request failed status={status} body={body}")]
    Upstream { status: u16, body: String },
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream response malformed: {0}")]
    MalformedResponse(String),
    #[error("invalid chat client config: {0}")]
    Config(String),
}

impl ChatError {
    /// Classifies a non-2xx upstream status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => ChatError::RateLimited,
            402 => ChatError::PaymentRequired,
            503 => ChatError::ServiceUnavailable,
            _ => ChatError::Upstream { status, body },
        }
    }
}
