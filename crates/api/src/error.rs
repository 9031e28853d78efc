use serde_json::json;
use thiserror::Error;

use saas_auth::AuthError;

/// Failure surfaced to the caller of a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication or permission failure, with a caller-facing message.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    /// The authorization core itself failed (broken table, untagged subject).
    #[error("authorization core failure: {0}")]
    Internal(#[from] AuthError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::BadRequest(_) => 400,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// JSON error body; internal failures do not leak their cause.
    pub fn to_body(&self) -> serde_json::Value {
        let message = match self {
            ApiError::Unauthorized(msg) | ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(_) => "internal server error".to_string(),
        };
        json!({
            "error": self.code(),
            "message": message,
        })
    }
}
