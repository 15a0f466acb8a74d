//! Authentication effects.
//!
//! Effects are **values**, not execution. The reducer returns them and the
//! [`AuthEffectRunner`](crate::AuthEffectRunner) interprets them against the
//! transport and notification channel.

use crate::state::{BearerToken, Operation, RequestId};
use crate::wire::FormBody;
use serde::{Deserialize, Serialize};

/// Authentication effect.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEffect {
    /// POST `body` to the operation's path.
    ///
    /// Feeds back `Fulfilled` or `Rejected`.
    Call {
        /// Request being served.
        request_id: RequestId,
        /// Operation (selects the path and response decoding).
        operation: Operation,
        /// Form-encoded body.
        body: FormBody,
    },

    /// Show a user-facing notification. Fire-and-forget.
    Notify(Notification),

    /// Set (`Some`) or clear (`None`) the transport's default bearer credential.
    SetBearer(Option<BearerToken>),

    /// Answer a request refused by the in-flight guard.
    ///
    /// Feeds back `Refused`.
    Refuse {
        /// Refused request.
        request_id: RequestId,
        /// Busy operation.
        operation: Operation,
    },
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A localized user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text to display.
    pub message: String,
}

impl Notification {
    /// Success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Failure notification.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Failure,
            message: message.into(),
        }
    }
}
