//! Unified client error handling
//!
//! Provides a consistent error taxonomy across the API client, the auth
//! service, and the data-service facade.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Non-2xx response carrying the server-provided `detail` message,
    /// or an endpoint-specific default when the body had none.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Wiring bug: a consumer reached for a context nothing provided.
    #[error("{0}")]
    Provider(String),

    #[error("Internal client error")]
    Internal(#[from] anyhow::Error),
}

/// Error body shape returned by the platform API.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

impl ClientError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Builds the error for a non-2xx response, preferring the server's
    /// `detail` field and falling back to the endpoint default.
    pub fn from_status(status: u16, detail: Option<String>, default_msg: &str) -> Self {
        let message = detail.unwrap_or_else(|| default_msg.to_string());
        match status {
            400 => Self::BadRequest(message),
            401 | 403 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            _ => Self::Http { status, message },
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
