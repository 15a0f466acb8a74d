//! Authentication environment.
//!
//! Read-only inputs the reducer consults. I/O dependencies (transport,
//! notifications) live in the effect runner, not here.

use crate::locale::{Locale, Messages};

/// Authentication environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthEnvironment {
    /// Localized success messages.
    pub messages: Messages,
}

impl AuthEnvironment {
    /// Environment for `locale`.
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self {
            messages: Messages::for_locale(locale),
        }
    }
}
