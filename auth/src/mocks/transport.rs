//! Mock transport for testing.

use crate::error::ApiError;
use crate::providers::Transport;
use crate::state::BearerToken;
use crate::wire::FormBody;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Path the body was posted to.
    pub path: String,
    /// Form body.
    pub body: FormBody,
    /// Bearer credential attached to the request.
    pub bearer: Option<BearerToken>,
}

/// Mock transport.
///
/// Replies are scripted per path and consumed in order. Posting to a path
/// with no scripted reply left fails with [`ApiError::Network`].
///
/// A *gated* transport holds every request until [`release`](Self::release)
/// lets it through, which makes the in-flight state observable.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<HashMap<String, VecDeque<Result<Value, ApiError>>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    bearer: Arc<Mutex<Option<BearerToken>>>,
    gate: Option<Arc<Semaphore>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Create a transport with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that holds requests until released.
    #[must_use]
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Let `n` held (or future) requests complete.
    ///
    /// No-op on an ungated transport.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Script a success body for the next request to `path`.
    pub fn reply(&self, path: &str, body: Value) {
        self.push(path, Ok(body));
    }

    /// Script a failure for the next request to `path`.
    pub fn fail(&self, path: &str, error: ApiError) {
        self.push(path, Err(error));
    }

    fn push(&self, path: &str, reply: Result<Value, ApiError>) {
        lock(&self.replies)
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    /// All requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Transport for MockTransport {
    fn post(&self, path: &str, body: &FormBody) -> impl Future<Output = Result<Value, ApiError>> + Send {
        lock(&self.requests).push(RecordedRequest {
            path: path.to_string(),
            body: body.clone(),
            bearer: self.bearer(),
        });

        let path = path.to_string();
        let replies = Arc::clone(&self.replies);
        let gate = self.gate.clone();

        async move {
            if let Some(gate) = gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }

            lock(&replies)
                .get_mut(&path)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Err(ApiError::Network(format!("no scripted reply for {path}"))))
        }
    }

    fn set_bearer(&self, token: Option<&BearerToken>) {
        *lock(&self.bearer) = token.cloned();
    }

    fn bearer(&self) -> Option<BearerToken> {
        lock(&self.bearer).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let transport = MockTransport::new();
        transport.reply("/login/", json!({"n": 1}));
        transport.fail("/login/", ApiError::Network("down".to_string()));

        let body = FormBody::new(vec![("email", "e@x.com".to_string())]);

        assert_eq!(transport.post("/login/", &body).await, Ok(json!({"n": 1})));
        assert_eq!(
            transport.post("/login/", &body).await,
            Err(ApiError::Network("down".to_string()))
        );
        assert!(matches!(
            transport.post("/login/", &body).await,
            Err(ApiError::Network(_))
        ));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn records_bearer_at_send_time() {
        let transport = MockTransport::new();
        transport.reply("/reset_password/", Value::Null);
        transport.set_bearer(Some(&BearerToken::new("T")));

        let _ = transport.post("/reset_password/", &FormBody::new(Vec::new())).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer, Some(BearerToken::new("T")));
    }
}
