//! Mock provider implementations for testing.
//!
//! In-memory implementations of the provider traits for unit and
//! integration tests.

pub mod notifier;
pub mod transport;

pub use notifier::RecordingNotifier;
pub use transport::{MockTransport, RecordedRequest};
