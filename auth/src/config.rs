//! Auth client configuration.
//!
//! Values come from the application (usually via [`AuthConfig::from_env`]),
//! never from constants in the reducer.

use crate::error::ConfigError;
use crate::locale::Locale;
use std::time::Duration;

/// Base URL of the API server.
pub const ENV_API_URL: &str = "GURUBOOK_API_URL";
/// UI locale (`hy` or `en`).
pub const ENV_LOCALE: &str = "GURUBOOK_LOCALE";
/// Seconds a caller waits for an operation's outcome.
pub const ENV_WAIT_TIMEOUT: &str = "GURUBOOK_WAIT_TIMEOUT_SECS";

/// Default caller wait, in seconds.
const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 60;

/// Auth client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Base URL the operation paths are appended to (e.g. `https://api.gurubook.am`).
    pub base_url: String,

    /// Locale of success notifications.
    ///
    /// Default: Armenian
    pub locale: Locale,

    /// How long [`AuthClient`](crate::AuthClient) waits for an outcome.
    ///
    /// This only bounds the wait. The request itself is never cancelled.
    ///
    /// Default: 60 seconds
    pub wait_timeout: Duration,
}

impl AuthConfig {
    /// Create a configuration with default locale and wait timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            locale: Locale::default(),
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
        }
    }

    /// Set the notification locale.
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the caller wait timeout.
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `GURUBOOK_API_URL` is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_URL))?;

        let mut config = Self::new(base_url.trim());

        if let Some(locale) = lookup(ENV_LOCALE) {
            config.locale = locale.parse()?;
        }

        if let Some(raw) = lookup(ENV_WAIT_TIMEOUT) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_WAIT_TIMEOUT,
                    value: raw.clone(),
                })?;
            config.wait_timeout = Duration::from_secs(secs);
        }

        tracing::debug!(
            base_url = %config.base_url,
            locale = ?config.locale,
            wait_timeout_secs = config.wait_timeout.as_secs(),
            "Loaded auth configuration"
        );

        Ok(config)
    }
}
