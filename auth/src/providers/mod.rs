//! Authentication providers.
//!
//! Traits for the external collaborators the effect runner drives, plus
//! their production implementations:
//!
//! - [`Transport`]: form-encoded POSTs and the default bearer header
//!   ([`HttpTransport`] over `reqwest`)
//! - [`Notifier`]: fire-and-forget user-facing messages
//!   ([`TracingNotifier`], [`ChannelNotifier`])
//!
//! Mocks for tests live in [`crate::mocks`].

pub mod http;
pub mod notifier;
pub mod transport;

pub use http::HttpTransport;
pub use notifier::{ChannelNotifier, Notifier, TracingNotifier};
pub use transport::Transport;
