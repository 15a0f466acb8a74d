//! Request and response shapes exchanged with the auth server.
//!
//! Requests are sent form-encoded. Login and registration answer with an
//! [`AuthPayload`]; the token field is spelled `accses_token` on the wire.

use crate::state::{BearerToken, Profile};
use serde::{Deserialize, Serialize};

/// Field names whose values are never printed.
const REDACTED_FIELDS: [&str; 3] = ["password", "new_password", "token"];

/// Form-encoded request body.
///
/// `Debug` redacts credentials so effect descriptions can be logged safely.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct FormBody(Vec<(&'static str, String)>);

impl FormBody {
    /// Build a body from `(field, value)` pairs, preserving order.
    #[must_use]
    pub const fn new(fields: Vec<(&'static str, String)>) -> Self {
        Self(fields)
    }

    /// The fields in submission order.
    #[must_use]
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.0
    }

    /// Value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }
}

impl std::fmt::Debug for FormBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (field, value) in &self.0 {
            if REDACTED_FIELDS.contains(field) {
                map.entry(field, &"<redacted>");
            } else {
                map.entry(field, value);
            }
        }
        map.finish()
    }
}

/// Login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plain-text password, sent over TLS.
    pub password: String,
}

impl LoginRequest {
    /// Create a login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Form body for `POST /login/`.
    #[must_use]
    pub fn form_body(&self) -> FormBody {
        FormBody::new(vec![
            ("email", self.email.clone()),
            ("password", self.password.clone()),
        ])
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Account registration.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
}

impl RegisterRequest {
    /// Create a registration request.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Form body for `POST /register/`.
    #[must_use]
    pub fn form_body(&self) -> FormBody {
        FormBody::new(vec![
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("email", self.email.clone()),
            ("password", self.password.clone()),
        ])
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// "Forgot password" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPasswordRequest {
    /// Account email the reset link is sent to.
    pub email: String,
}

impl ResetPasswordRequest {
    /// Create a reset request.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }

    /// Form body for `POST /forgot_password/`.
    #[must_use]
    pub fn form_body(&self) -> FormBody {
        FormBody::new(vec![("email", self.email.clone())])
    }
}

/// New password submission, authorized by the out-of-band reset token.
#[derive(Clone, PartialEq, Eq)]
pub struct SetNewPasswordRequest {
    /// The new password.
    pub new_password: String,
    /// Reset token from the "forgot password" email (not the bearer token).
    pub token: String,
}

impl SetNewPasswordRequest {
    /// Create a set-new-password request.
    #[must_use]
    pub fn new(new_password: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            new_password: new_password.into(),
            token: token.into(),
        }
    }

    /// Form body for `POST /forgot_password/new_password/`.
    #[must_use]
    pub fn form_body(&self) -> FormBody {
        FormBody::new(vec![
            ("new_password", self.new_password.clone()),
            ("token", self.token.clone()),
        ])
    }
}

impl std::fmt::Debug for SetNewPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetNewPasswordRequest").finish_non_exhaustive()
    }
}

/// Successful login/registration response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Bearer token. The server spells the field `accses_token`.
    #[serde(rename = "accses_token")]
    pub access_token: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
}

impl AuthPayload {
    /// The bearer credential carried by this response.
    #[must_use]
    pub fn token(&self) -> BearerToken {
        BearerToken::new(self.access_token.clone())
    }

    /// The user profile carried by this response.
    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPayload")
            .field("access_token", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish()
    }
}
