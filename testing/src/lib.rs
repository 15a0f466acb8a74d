//! # Gurubook Testing
//!
//! Testing utilities for reducers built on `gurubook-core`.
//!
//! This crate provides:
//! - [`ReducerTest`]: a Given-When-Then harness that runs a reducer without a runtime
//! - [`assertions`]: helpers for inspecting returned effect descriptions
//! - [`init_test_tracing`]: opt-in log output for failing tests
//!
//! ## Example
//!
//! ```ignore
//! use gurubook_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(AuthReducer::new())
//!     .with_env(AuthEnvironment::default())
//!     .given_state(Session::default())
//!     .when_action(AuthAction::SignOut)
//!     .then_state(|s| assert!(!s.loading))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Install a test-writer tracing subscriber once per process
///
/// Honors `RUST_LOG`; output is captured by the test harness unless
/// `--nocapture` is passed. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}
