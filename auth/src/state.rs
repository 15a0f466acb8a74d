//! Authentication session state.
//!
//! The [`Session`] is the in-memory record of the current user's
//! authentication status. It is owned by the store; consumers read it
//! through `Store::state` or [`AuthClient::session`](crate::AuthClient::session).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Correlates a request action with its terminal action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    /// Generate a new random `RequestId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bearer credential returned by the server on login or registration.
///
/// `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════════════════════════════════

/// The four request operations of the auth store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `POST /login/`
    Login,
    /// `POST /register/`
    Register,
    /// `POST /forgot_password/`
    ResetPassword,
    /// `POST /forgot_password/new_password/`
    SetNewPassword,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Login,
        Self::Register,
        Self::ResetPassword,
        Self::SetNewPassword,
    ];

    /// Server path the operation posts to.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login/",
            Self::Register => "/register/",
            Self::ResetPassword => "/forgot_password/",
            Self::SetNewPassword => "/forgot_password/new_password/",
        }
    }

    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::ResetPassword => "reset_password",
            Self::SetNewPassword => "set_new_password",
        }
    }

    /// Whether a successful response carries a token and profile.
    #[must_use]
    pub const fn establishes_session(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Profile of the signed-in user, taken from a login/registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
}

/// Authentication session.
///
/// # Invariants
///
/// - `loading` is true iff at least one operation is pending
/// - `token` and `profile` are either both set or both unset
///
/// The reducer is the only writer; the helpers below keep both invariants.
///
/// # Examples
///
/// ```
/// # use gurubook_auth::Session;
/// let session = Session::default();
/// assert!(!session.is_logged_in);
/// assert!(!session.loading);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// True only after a successful login or registration.
    pub is_logged_in: bool,

    /// Bearer credential for later requests.
    pub token: Option<BearerToken>,

    /// Signed-in user's profile.
    pub profile: Option<Profile>,

    /// True while any operation is in flight.
    pub loading: bool,

    /// The in-flight request of each operation kind.
    #[serde(skip)]
    pub pending: BTreeMap<Operation, RequestId>,
}

impl Session {
    /// A signed-out, idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an operation of this kind is in flight.
    #[must_use]
    pub fn is_pending(&self, operation: Operation) -> bool {
        self.pending.contains_key(&operation)
    }

    /// The in-flight request for an operation, if any.
    #[must_use]
    pub fn pending_request(&self, operation: Operation) -> Option<RequestId> {
        self.pending.get(&operation).copied()
    }

    /// Mark `operation` as in flight under `request_id`.
    pub(crate) fn begin(&mut self, operation: Operation, request_id: RequestId) {
        self.pending.insert(operation, request_id);
        self.sync_loading();
    }

    /// End the pending transition for `request_id`.
    ///
    /// Returns `false` (and changes nothing) when `request_id` is not the
    /// in-flight request for `operation`, i.e. the outcome is stale.
    pub(crate) fn finish(&mut self, operation: Operation, request_id: RequestId) -> bool {
        if self.pending.get(&operation) != Some(&request_id) {
            return false;
        }
        self.pending.remove(&operation);
        self.sync_loading();
        true
    }

    /// Record a successful login or registration.
    pub(crate) fn establish(&mut self, token: BearerToken, profile: Profile) {
        self.is_logged_in = true;
        self.token = Some(token);
        self.profile = Some(profile);
    }

    /// Reset to the signed-out, idle session.
    pub(crate) fn sign_out(&mut self) {
        *self = Self::default();
    }

    fn sync_loading(&mut self) {
        self.loading = !self.pending.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "e@x.com".to_string(),
        }
    }

    #[test]
    fn loading_follows_pending_operations() {
        let mut session = Session::new();
        let login = RequestId::new();
        let reset = RequestId::new();

        session.begin(Operation::Login, login);
        session.begin(Operation::ResetPassword, reset);
        assert!(session.loading);

        assert!(session.finish(Operation::ResetPassword, reset));
        assert!(session.loading, "login is still pending");

        assert!(session.finish(Operation::Login, login));
        assert!(!session.loading);
    }

    #[test]
    fn finish_ignores_unknown_request() {
        let mut session = Session::new();
        let current = RequestId::new();
        session.begin(Operation::Login, current);

        assert!(!session.finish(Operation::Login, RequestId::new()));
        assert!(!session.finish(Operation::Register, current));
        assert_eq!(session.pending_request(Operation::Login), Some(current));
        assert!(session.loading);
    }

    #[test]
    fn sign_out_clears_everything() {
        let mut session = Session::new();
        session.establish(BearerToken::new("T"), profile());
        session.begin(Operation::Register, RequestId::new());

        session.sign_out();

        assert_eq!(session, Session::default());
    }

    #[test]
    fn bearer_token_debug_is_redacted() {
        let token = BearerToken::new("super-secret");
        assert_eq!(format!("{token:?}"), "BearerToken(<redacted>)");
        assert_eq!(token.header_value(), "Bearer super-secret");
    }

    #[test]
    fn session_serializes_with_camel_case_keys() {
        let mut session = Session::new();
        session.establish(BearerToken::new("T"), profile());

        let json = serde_json::to_value(&session).unwrap_or_default();
        assert_eq!(json["isLoggedIn"], true);
        assert_eq!(json["token"], "T");
        assert_eq!(json["profile"]["firstName"], "A");
        assert!(json.get("pending").is_none());
    }

    #[test]
    fn operation_paths_match_server_routes() {
        let paths: Vec<_> = Operation::ALL.iter().map(|op| op.path()).collect();
        assert_eq!(
            paths,
            ["/login/", "/register/", "/forgot_password/", "/forgot_password/new_password/"]
        );
    }
}
