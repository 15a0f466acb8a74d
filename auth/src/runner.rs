//! Effect runner for the auth store.
//!
//! Interprets [`AuthEffect`] values against a [`Transport`] and a
//! [`Notifier`]. Only `Call` and `Refuse` feed an action back into the store.

use crate::actions::{ApiResponse, AuthAction};
use crate::effects::AuthEffect;
use crate::providers::{Notifier, Transport};
use gurubook_core::effect::EffectRunner;
use std::future::Future;
use std::sync::Arc;

/// Executes authentication effects.
#[derive(Debug)]
pub struct AuthEffectRunner<T, N> {
    transport: Arc<T>,
    notifier: Arc<N>,
}

impl<T, N> AuthEffectRunner<T, N> {
    /// Create a runner.
    #[must_use]
    pub const fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    /// The transport calls are sent through.
    #[must_use]
    pub const fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The notification sink.
    #[must_use]
    pub const fn notifier(&self) -> &Arc<N> {
        &self.notifier
    }
}

impl<T, N> Clone for AuthEffectRunner<T, N> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<T, N> EffectRunner for AuthEffectRunner<T, N>
where
    T: Transport + 'static,
    N: Notifier + 'static,
{
    type Effect = AuthEffect;
    type Action = AuthAction;

    fn run(&self, effect: AuthEffect) -> impl Future<Output = Option<AuthAction>> + Send {
        let transport = Arc::clone(&self.transport);
        let notifier = Arc::clone(&self.notifier);

        async move {
            match effect {
                AuthEffect::Call {
                    request_id,
                    operation,
                    body,
                } => {
                    let result = transport
                        .post(operation.path(), &body)
                        .await
                        .and_then(|raw| ApiResponse::decode(operation, raw));

                    Some(match result {
                        Ok(response) => AuthAction::Fulfilled {
                            request_id,
                            operation,
                            response,
                        },
                        Err(error) => AuthAction::Rejected {
                            request_id,
                            operation,
                            error,
                        },
                    })
                },
                AuthEffect::Notify(notification) => {
                    notifier.notify(notification);
                    None
                },
                AuthEffect::SetBearer(token) => {
                    tracing::debug!(set = token.is_some(), "Updating default bearer credential");
                    transport.set_bearer(token.as_ref());
                    None
                },
                AuthEffect::Refuse {
                    request_id,
                    operation,
                } => Some(AuthAction::Refused {
                    request_id,
                    operation,
                }),
            }
        }
    }
}
