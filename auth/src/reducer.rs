//! Authentication reducer.
//!
//! Maps each request to a pending → fulfilled/rejected lifecycle over the
//! [`Session`]:
//!
//! | Action | Session | Effects |
//! |---|---|---|
//! | request, operation idle | operation pending, `loading = true` | `Call` |
//! | request, operation busy | unchanged | `Refuse` |
//! | `Fulfilled` (login/register) | pending cleared, token + profile set | `SetBearer`, success `Notify` |
//! | `Fulfilled` (reset flows) | pending cleared | none |
//! | `Rejected` | pending cleared | failure `Notify` |
//! | `SignOut` | reset to default | `SetBearer(None)` |
//!
//! Outcomes whose request id is not the pending one for their operation
//! (for example after a sign-out) are stale and leave the session untouched.

use crate::actions::{ApiResponse, AuthAction};
use crate::effects::{AuthEffect, Notification};
use crate::environment::AuthEnvironment;
use crate::state::{Operation, RequestId, Session};
use crate::wire::FormBody;
use gurubook_core::reducer::Reducer;
use gurubook_core::{smallvec, SmallVec};

/// Authentication reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Start `operation` unless one of the same kind is already in flight.
    fn begin(
        session: &mut Session,
        operation: Operation,
        request_id: RequestId,
        body: FormBody,
    ) -> SmallVec<[AuthEffect; 4]> {
        if let Some(current) = session.pending_request(operation) {
            tracing::warn!(%operation, %request_id, %current, "Refusing request: operation already in flight");
            return smallvec![AuthEffect::Refuse {
                request_id,
                operation,
            }];
        }

        tracing::debug!(%operation, %request_id, "Request pending");
        session.begin(operation, request_id);

        smallvec![AuthEffect::Call {
            request_id,
            operation,
            body,
        }]
    }
}

impl Reducer for AuthReducer {
    type State = Session;
    type Action = AuthAction;
    type Effect = AuthEffect;
    type Environment = AuthEnvironment;

    fn reduce(
        &self,
        session: &mut Session,
        action: AuthAction,
        env: &AuthEnvironment,
    ) -> SmallVec<[AuthEffect; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Requests
            // ═══════════════════════════════════════════════════════════════
            AuthAction::Login {
                request_id,
                request,
            } => Self::begin(session, Operation::Login, request_id, request.form_body()),

            AuthAction::Register {
                request_id,
                request,
            } => Self::begin(session, Operation::Register, request_id, request.form_body()),

            AuthAction::ResetPassword {
                request_id,
                request,
            } => Self::begin(session, Operation::ResetPassword, request_id, request.form_body()),

            AuthAction::SetNewPassword {
                request_id,
                request,
            } => Self::begin(session, Operation::SetNewPassword, request_id, request.form_body()),

            AuthAction::SignOut => {
                tracing::info!(was_logged_in = session.is_logged_in, "Signing out");
                session.sign_out();
                smallvec![AuthEffect::SetBearer(None)]
            },

            // ═══════════════════════════════════════════════════════════════
            // Outcomes
            // ═══════════════════════════════════════════════════════════════
            AuthAction::Fulfilled {
                request_id,
                operation,
                response,
            } => {
                if !session.finish(operation, request_id) {
                    tracing::warn!(%operation, %request_id, "Ignoring stale fulfilled outcome");
                    return SmallVec::new();
                }

                match response {
                    ApiResponse::Authenticated(payload) if operation.establishes_session() => {
                        let token = payload.token();
                        session.establish(token.clone(), payload.profile());
                        tracing::info!(%operation, email = %payload.email, "Session established");

                        let mut effects = smallvec![AuthEffect::SetBearer(Some(token))];
                        if let Some(message) = env.messages.success(operation) {
                            effects.push(AuthEffect::Notify(Notification::success(message)));
                        }
                        effects
                    },
                    _ => {
                        tracing::info!(%operation, "Request fulfilled");
                        SmallVec::new()
                    },
                }
            },

            AuthAction::Rejected {
                request_id,
                operation,
                error,
            } => {
                if !session.finish(operation, request_id) {
                    tracing::warn!(%operation, %request_id, "Ignoring stale rejected outcome");
                    return SmallVec::new();
                }

                tracing::warn!(%operation, error = %error, "Request rejected");
                smallvec![AuthEffect::Notify(Notification::failure(error.message()))]
            },

            AuthAction::Refused { .. } => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::state::BearerToken;
    use crate::wire::{AuthPayload, LoginRequest, ResetPasswordRequest};

    fn payload() -> AuthPayload {
        AuthPayload {
            access_token: "T".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "e@x.com".to_string(),
        }
    }

    #[test]
    fn login_starts_call_with_form_body() {
        let mut session = Session::new();
        let request_id = RequestId::new();
        let request = LoginRequest::new("e@x.com", "pw");

        let effects = AuthReducer.reduce(
            &mut session,
            AuthAction::Login {
                request_id,
                request: request.clone(),
            },
            &AuthEnvironment::default(),
        );

        assert!(session.loading);
        assert_eq!(effects.as_slice(), &[AuthEffect::Call {
            request_id,
            operation: Operation::Login,
            body: request.form_body(),
        }]);
    }

    #[test]
    fn fulfilled_login_sets_bearer_before_notifying() {
        let mut session = Session::new();
        let request_id = RequestId::new();
        session.begin(Operation::Login, request_id);

        let effects = AuthReducer.reduce(
            &mut session,
            AuthAction::Fulfilled {
                request_id,
                operation: Operation::Login,
                response: ApiResponse::Authenticated(payload()),
            },
            &AuthEnvironment::default(),
        );

        assert_eq!(effects.as_slice(), &[
            AuthEffect::SetBearer(Some(BearerToken::new("T"))),
            AuthEffect::Notify(Notification::success("Բարի գալուստ Gurubook")),
        ]);
    }

    #[test]
    fn stale_rejection_is_ignored() {
        let mut session = Session::new();
        let current = RequestId::new();
        session.begin(Operation::ResetPassword, current);
        let before = session.clone();

        let effects = AuthReducer.reduce(
            &mut session,
            AuthAction::Rejected {
                request_id: RequestId::new(),
                operation: Operation::ResetPassword,
                error: ApiError::Network("timeout".to_string()),
            },
            &AuthEnvironment::default(),
        );

        assert!(effects.is_empty());
        assert_eq!(session, before);
    }

    #[test]
    fn refused_outcome_changes_nothing() {
        let mut session = Session::new();
        session.begin(Operation::ResetPassword, RequestId::new());
        let before = session.clone();

        let effects = AuthReducer.reduce(
            &mut session,
            AuthAction::Refused {
                request_id: RequestId::new(),
                operation: Operation::ResetPassword,
            },
            &AuthEnvironment::default(),
        );

        assert!(effects.is_empty());
        assert_eq!(session, before);
    }

    #[test]
    fn second_request_of_same_kind_is_refused() {
        let mut session = Session::new();
        let first = RequestId::new();
        let second = RequestId::new();
        let env = AuthEnvironment::default();

        let _ = AuthReducer.reduce(
            &mut session,
            AuthAction::ResetPassword {
                request_id: first,
                request: ResetPasswordRequest::new("e@x.com"),
            },
            &env,
        );
        let effects = AuthReducer.reduce(
            &mut session,
            AuthAction::ResetPassword {
                request_id: second,
                request: ResetPasswordRequest::new("e@x.com"),
            },
            &env,
        );

        assert_eq!(effects.as_slice(), &[AuthEffect::Refuse {
            request_id: second,
            operation: Operation::ResetPassword,
        }]);
        assert_eq!(session.pending_request(Operation::ResetPassword), Some(first));
    }
}
