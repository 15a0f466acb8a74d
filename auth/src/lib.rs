//! # Gurubook Authentication
//!
//! Session management for the Gurubook client: login, registration and the
//! two-step password reset, built as a reducer over a [`Session`] with
//! effects executed against a pluggable [`Transport`](providers::Transport).
//!
//! ## Architecture
//!
//! ```text
//! Action → AuthReducer → (Session, Effects) → AuthEffectRunner → Outcome Action
//! ```
//!
//! - **Requests** (`Login`, `Register`, `ResetPassword`, `SetNewPassword`)
//!   mark their operation pending and emit a `Call` effect
//! - **Outcomes** (`Fulfilled`, `Rejected`) clear it; a successful login or
//!   registration also stores the token and profile, sets the transport's
//!   bearer credential and notifies the user
//! - `SignOut` resets the session and clears the bearer
//!
//! Only one request per operation may be in flight; a second one is refused.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gurubook_auth::{AuthClient, AuthConfig};
//! use gurubook_auth::providers::{HttpTransport, TracingNotifier};
//! use std::sync::Arc;
//!
//! let config = AuthConfig::from_env()?;
//! let client = AuthClient::new(
//!     &config,
//!     Arc::new(HttpTransport::from_config(&config)),
//!     Arc::new(TracingNotifier),
//! );
//!
//! let payload = client.login("e@x.com", "pw").await?;
//! assert!(client.session().await.is_logged_in);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod client;
pub mod config;
pub mod effects;
pub mod environment;
pub mod error;
pub mod locale;
pub mod providers;
pub mod reducer;
pub mod runner;
pub mod state;
pub mod wire;

// Mock implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::{ApiResponse, AuthAction};
pub use client::{AuthClient, AuthStore};
pub use config::AuthConfig;
pub use effects::{AuthEffect, Notification, NotificationLevel};
pub use environment::AuthEnvironment;
pub use error::{ApiError, AuthError, ConfigError, Result};
pub use locale::{Locale, Messages};
pub use reducer::AuthReducer;
pub use runner::AuthEffectRunner;
pub use state::{BearerToken, Operation, Profile, RequestId, Session};
pub use wire::{
    AuthPayload, FormBody, LoginRequest, RegisterRequest, ResetPasswordRequest,
    SetNewPasswordRequest,
};
