//! Transport provider trait.

use crate::error::ApiError;
use crate::state::BearerToken;
use crate::wire::FormBody;

/// Outbound request layer.
///
/// Abstracts the HTTP client so the runner can be exercised against
/// scripted replies.
pub trait Transport: Send + Sync {
    /// POST a form-encoded body to `path` (relative to the configured base URL).
    ///
    /// The current default bearer credential, if any, is attached.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Server`] for non-success responses (message taken
    /// from the body's `error` field), [`ApiError::Network`] when no response
    /// arrived, and [`ApiError::Decode`] when a success body is not JSON.
    fn post(
        &self,
        path: &str,
        body: &FormBody,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, ApiError>> + Send;

    /// Replace the default bearer credential (`None` clears it).
    fn set_bearer(&self, token: Option<&BearerToken>);

    /// The current default bearer credential.
    fn bearer(&self) -> Option<BearerToken>;
}
