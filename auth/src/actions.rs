//! Authentication actions.
//!
//! Actions are the only way to change the [`Session`](crate::Session):
//! - **Requests**: user intent (`Login`, `Register`, ..., `SignOut`)
//! - **Outcomes**: results of the network round-trip (`Fulfilled`, `Rejected`)
//!   and of the in-flight guard (`Refused`), fed back by the effect runner

use crate::error::ApiError;
use crate::state::{Operation, RequestId};
use crate::wire::{
    AuthPayload, LoginRequest, RegisterRequest, ResetPasswordRequest, SetNewPasswordRequest,
};

/// Authentication action.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Requests
    // ═══════════════════════════════════════════════════════════════════════
    /// Log in with email and password.
    Login {
        /// Correlates this request with its outcome.
        request_id: RequestId,
        /// Credentials.
        request: LoginRequest,
    },

    /// Create an account (and log in).
    Register {
        /// Correlates this request with its outcome.
        request_id: RequestId,
        /// Account details.
        request: RegisterRequest,
    },

    /// Ask the server to send a password reset email.
    ResetPassword {
        /// Correlates this request with its outcome.
        request_id: RequestId,
        /// Account email.
        request: ResetPasswordRequest,
    },

    /// Submit a new password with an out-of-band reset token.
    SetNewPassword {
        /// Correlates this request with its outcome.
        request_id: RequestId,
        /// New password and reset token.
        request: SetNewPasswordRequest,
    },

    /// Clear the session and the outbound bearer credential.
    SignOut,

    // ═══════════════════════════════════════════════════════════════════════
    // Outcomes
    // ═══════════════════════════════════════════════════════════════════════
    /// The server accepted the request.
    Fulfilled {
        /// The request this answers.
        request_id: RequestId,
        /// Which operation completed.
        operation: Operation,
        /// Decoded response.
        response: ApiResponse,
    },

    /// The request failed; `error` is forwarded to awaiting callers.
    Rejected {
        /// The request this answers.
        request_id: RequestId,
        /// Which operation failed.
        operation: Operation,
        /// Transport or server error.
        error: ApiError,
    },

    /// The request was refused because the same operation is already in flight.
    Refused {
        /// The refused request.
        request_id: RequestId,
        /// The operation that is busy.
        operation: Operation,
    },
}

impl AuthAction {
    /// Login action with a fresh request id.
    #[must_use]
    pub fn login(request: LoginRequest) -> Self {
        Self::Login {
            request_id: RequestId::new(),
            request,
        }
    }

    /// Register action with a fresh request id.
    #[must_use]
    pub fn register(request: RegisterRequest) -> Self {
        Self::Register {
            request_id: RequestId::new(),
            request,
        }
    }

    /// Reset-password action with a fresh request id.
    #[must_use]
    pub fn reset_password(request: ResetPasswordRequest) -> Self {
        Self::ResetPassword {
            request_id: RequestId::new(),
            request,
        }
    }

    /// Set-new-password action with a fresh request id.
    #[must_use]
    pub fn set_new_password(request: SetNewPasswordRequest) -> Self {
        Self::SetNewPassword {
            request_id: RequestId::new(),
            request,
        }
    }

    /// The correlation id carried by this action, if any.
    #[must_use]
    pub const fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Login { request_id, .. }
            | Self::Register { request_id, .. }
            | Self::ResetPassword { request_id, .. }
            | Self::SetNewPassword { request_id, .. }
            | Self::Fulfilled { request_id, .. }
            | Self::Rejected { request_id, .. }
            | Self::Refused { request_id, .. } => Some(*request_id),
            Self::SignOut => None,
        }
    }

    /// Whether this action ends the request `request_id`.
    #[must_use]
    pub fn is_outcome_of(&self, request_id: RequestId) -> bool {
        match self {
            Self::Fulfilled { request_id: id, .. }
            | Self::Rejected { request_id: id, .. }
            | Self::Refused { request_id: id, .. } => *id == request_id,
            _ => false,
        }
    }
}

/// Decoded success response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Login/registration: token and profile.
    Authenticated(AuthPayload),
    /// Any other operation: the raw body (`Null` when empty).
    Acknowledged(serde_json::Value),
}

impl ApiResponse {
    /// Decode a raw success body for `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when a login/registration body lacks the
    /// token or profile fields.
    pub fn decode(operation: Operation, body: serde_json::Value) -> Result<Self, ApiError> {
        if !operation.establishes_session() {
            return Ok(Self::Acknowledged(body));
        }

        serde_json::from_value(body)
            .map(Self::Authenticated)
            .map_err(|e| ApiError::Decode(format!("unexpected {operation} response: {e}")))
    }

    /// The login/registration payload, if this is one.
    #[must_use]
    pub fn into_payload(self) -> Option<AuthPayload> {
        match self {
            Self::Authenticated(payload) => Some(payload),
            Self::Acknowledged(_) => None,
        }
    }

    /// The raw body of an acknowledged operation, if this is one.
    #[must_use]
    pub fn into_body(self) -> Option<serde_json::Value> {
        match self {
            Self::Acknowledged(body) => Some(body),
            Self::Authenticated(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_login_body() {
        let response = ApiResponse::decode(
            Operation::Login,
            json!({"accses_token": "T", "first_name": "A", "last_name": "B", "email": "e@x.com"}),
        );

        let payload = response.ok().and_then(ApiResponse::into_payload);
        assert_eq!(payload.map(|p| p.access_token), Some("T".to_string()));
    }

    #[test]
    fn decode_login_body_without_token_fails() {
        let response = ApiResponse::decode(Operation::Register, json!({"first_name": "A"}));

        assert!(matches!(response, Err(ApiError::Decode(msg)) if msg.starts_with("unexpected register response")));
    }

    #[test]
    fn reset_body_is_passed_through() {
        let response = ApiResponse::decode(Operation::ResetPassword, json!({"message": "sent"}));

        assert_eq!(response, Ok(ApiResponse::Acknowledged(json!({"message": "sent"}))));
    }

    #[test]
    fn outcome_matching_uses_request_id() {
        let id = RequestId::new();
        let refused = AuthAction::Refused {
            request_id: id,
            operation: Operation::Login,
        };

        assert!(refused.is_outcome_of(id));
        assert!(!refused.is_outcome_of(RequestId::new()));
        assert!(!AuthAction::SignOut.is_outcome_of(id));

        let login = AuthAction::Login {
            request_id: id,
            request: LoginRequest::new("e@x.com", "pw"),
        };
        assert_eq!(login.request_id(), Some(id));
        assert!(!login.is_outcome_of(id));
    }
}
