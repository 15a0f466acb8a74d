//! `reqwest`-backed transport.

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::providers::Transport;
use crate::state::BearerToken;
use crate::wire::FormBody;
use reqwest::Client;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// HTTP transport posting form bodies to `{base_url}{path}`.
///
/// Clones share the default bearer credential.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    bearer: Arc<RwLock<Option<BearerToken>>>,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a default `reqwest` client.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a transport from configuration.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// Create a transport with a preconfigured client (proxies, TLS roots, timeouts).
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            bearer: Arc::new(RwLock::new(None)),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        path: &str,
        body: &FormBody,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send {
        let url = self.url(path);
        let mut request = self.client.post(&url).form(body.fields());
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token.as_str());
        }

        async move {
            tracing::debug!(%url, "POST");

            let response = request
                .send()
                .await
                .map_err(|e| ApiError::Network(format!("request to {url} failed: {e}")))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Network(format!("failed to read response from {url}: {e}")))?;

            if status.is_success() {
                if text.trim().is_empty() {
                    return Ok(serde_json::Value::Null);
                }
                return serde_json::from_str(&text)
                    .map_err(|e| ApiError::Decode(format!("invalid JSON from {url}: {e}")));
            }

            tracing::debug!(%url, status = status.as_u16(), "Server returned an error");

            let payload = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
            let fallback = if payload.is_null() && !text.trim().is_empty() {
                text.trim().to_string()
            } else {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            };

            Err(ApiError::from_error_body(status.as_u16(), payload, &fallback))
        }
    }

    fn set_bearer(&self, token: Option<&BearerToken>) {
        let mut bearer = match self.bearer.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *bearer = token.cloned();
    }

    fn bearer(&self) -> Option<BearerToken> {
        match self.bearer.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_and_path() {
        let transport = HttpTransport::new("http://localhost:8000/api/");
        assert_eq!(transport.base_url(), "http://localhost:8000/api");
        assert_eq!(transport.url("/login/"), "http://localhost:8000/api/login/");
    }

    #[test]
    fn clones_share_bearer() {
        let transport = HttpTransport::new("http://localhost:8000");
        let clone = transport.clone();

        transport.set_bearer(Some(&BearerToken::new("T")));
        assert_eq!(clone.bearer(), Some(BearerToken::new("T")));

        clone.set_bearer(None);
        assert_eq!(transport.bearer(), None);
    }
}
