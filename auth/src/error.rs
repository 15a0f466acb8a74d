//! Error types for the auth client.

use crate::state::{Operation, RequestId};
use gurubook_runtime::StoreError;
use thiserror::Error;

/// Result type alias for auth client operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure reported by the transport layer.
///
/// The reducer treats every variant the same way: stop loading, show the
/// message, keep the session. The variants only matter to programmatic
/// callers. `Display` is the bare message so it can be shown to users as-is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the server's `error` field.
        message: String,
        /// Full error body, `Null` if it was not JSON.
        payload: serde_json::Value,
    },

    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Server { message, .. } => message,
            Self::Network(message) | Self::Decode(message) => message,
        }
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Build a server error from a JSON error body such as `{"error": "bad credentials"}`.
    ///
    /// Falls back to `fallback` when the body has no string `error` field.
    #[must_use]
    pub fn from_error_body(status: u16, payload: serde_json::Value, fallback: &str) -> Self {
        let message = payload
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(fallback)
            .to_string();

        Self::Server {
            status,
            message,
            payload,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// The locale is not supported.
    #[error("unsupported locale {0:?} (expected \"hy\" or \"en\")")]
    InvalidLocale(String),

    /// A numeric variable could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Errors returned by [`AuthClient`](crate::AuthClient) operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    /// The request was rejected; carries the transport error payload.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An operation of the same kind is already in flight.
    #[error("{0} is already in progress")]
    InFlight(Operation),

    /// The request's cascade finished but its outcome was not observed,
    /// because the outcome subscriber lagged behind the broadcast.
    #[error("outcome of request {0} was missed")]
    OutcomeMissed(RequestId),

    /// The store refused the action or the wait timed out.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
