//! Request/response facade over the auth store.
//!
//! Each call sends one action, waits until its whole effect cascade has
//! finished (call, bearer update, notification), and returns the outcome
//! that ended it. By the time `login` returns `Ok`, the session is
//! established, the transport carries the new bearer and the welcome
//! notification has been delivered.

use crate::actions::{ApiResponse, AuthAction};
use crate::config::AuthConfig;
use crate::environment::AuthEnvironment;
use crate::error::{ApiError, AuthError, Result};
use crate::providers::{Notifier, Transport};
use crate::reducer::AuthReducer;
use crate::runner::AuthEffectRunner;
use crate::state::Session;
use crate::wire::{
    AuthPayload, LoginRequest, RegisterRequest, ResetPasswordRequest, SetNewPasswordRequest,
};
use gurubook_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

/// The store type driven by [`AuthClient`].
pub type AuthStore<T, N> = Store<AuthReducer, AuthEffectRunner<T, N>>;

/// Authentication client.
pub struct AuthClient<T, N>
where
    T: Transport + 'static,
    N: Notifier + 'static,
{
    store: AuthStore<T, N>,
    transport: Arc<T>,
    wait_timeout: Duration,
}

impl<T, N> AuthClient<T, N>
where
    T: Transport + 'static,
    N: Notifier + 'static,
{
    /// Create a client with a fresh, logged-out session.
    #[must_use]
    pub fn new(config: &AuthConfig, transport: Arc<T>, notifier: Arc<N>) -> Self {
        let runner = AuthEffectRunner::new(Arc::clone(&transport), notifier);
        let store = Store::new(
            Session::new(),
            AuthReducer::new(),
            AuthEnvironment::new(config.locale),
            runner,
        );

        Self {
            store,
            transport,
            wait_timeout: config.wait_timeout,
        }
    }

    /// The underlying store, for observers and raw actions.
    #[must_use]
    pub const fn store(&self) -> &AuthStore<T, N> {
        &self.store
    }

    /// The transport requests go through.
    #[must_use]
    pub const fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.store.state(Clone::clone).await
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Api`]: the server rejected the credentials or was unreachable
    /// - [`AuthError::InFlight`]: a login is already in progress
    /// - [`AuthError::Store`]: the wait timed out or the store is shutting down
    /// - [`AuthError::OutcomeMissed`]: too many concurrent outcomes overflowed
    ///   the action broadcast before this one was read
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let action = AuthAction::login(LoginRequest::new(email, password));
        Self::payload(self.submit(action).await?)
    }

    /// Create an account and log in.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthPayload> {
        Self::payload(self.submit(AuthAction::register(request)).await?)
    }

    /// Ask the server to email a password reset link.
    ///
    /// Returns the server's response body (`Null` when empty).
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn reset_password(&self, email: &str) -> Result<serde_json::Value> {
        let action = AuthAction::reset_password(ResetPasswordRequest::new(email));
        Ok(Self::body(self.submit(action).await?))
    }

    /// Set a new password using the token from the reset email.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn set_new_password(&self, new_password: &str, token: &str) -> Result<serde_json::Value> {
        let action = AuthAction::set_new_password(SetNewPasswordRequest::new(new_password, token));
        Ok(Self::body(self.submit(action).await?))
    }

    /// Clear the session and the transport's bearer credential.
    ///
    /// Requests still in flight complete, but their outcomes no longer touch
    /// the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if the store is shutting down or the
    /// bearer could not be cleared in time.
    pub async fn sign_out(&self) -> Result<()> {
        let mut handle = self.store.send(AuthAction::SignOut).await?;
        handle.wait_with_timeout(self.wait_timeout).await?;
        Ok(())
    }

    /// Refuse new requests and wait for running effects to finish.
    ///
    /// Requests already in flight still reach their terminal transition, and
    /// their callers still receive the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if effects are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    /// Send a request action and return the outcome that ended it.
    async fn submit(&self, action: AuthAction) -> Result<ApiResponse> {
        let Some(request_id) = action.request_id() else {
            return Err(StoreError::ChannelClosed.into());
        };

        let mut outcomes = self.store.subscribe_actions();
        let mut handle = self.store.send(action).await?;
        handle.wait_with_timeout(self.wait_timeout).await?;

        loop {
            let action = match outcomes.try_recv() {
                Ok(action) => action,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, %request_id, "Outcome observer lagged");
                    continue;
                },
                // Every cascade broadcasts its outcome, so a drained channel
                // means the outcome was among the lagged actions.
                Err(TryRecvError::Empty) => {
                    tracing::warn!(%request_id, "Outcome not found after cascade finished");
                    return Err(AuthError::OutcomeMissed(request_id));
                },
                Err(TryRecvError::Closed) => return Err(StoreError::ChannelClosed.into()),
            };

            if !action.is_outcome_of(request_id) {
                continue;
            }

            return match action {
                AuthAction::Fulfilled { response, .. } => Ok(response),
                AuthAction::Rejected { error, .. } => Err(AuthError::Api(error)),
                AuthAction::Refused { operation, .. } => Err(AuthError::InFlight(operation)),
                _ => Err(StoreError::ChannelClosed.into()),
            };
        }
    }

    fn payload(response: ApiResponse) -> Result<AuthPayload> {
        response
            .into_payload()
            .ok_or_else(|| ApiError::Decode("expected a token and profile".to_string()).into())
    }

    fn body(response: ApiResponse) -> serde_json::Value {
        response.into_body().unwrap_or(serde_json::Value::Null)
    }
}

impl<T, N> std::fmt::Debug for AuthClient<T, N>
where
    T: Transport + 'static,
    N: Notifier + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("wait_timeout", &self.wait_timeout)
            .finish_non_exhaustive()
    }
}
