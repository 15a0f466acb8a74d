//! Localized notification strings.

use crate::error::ConfigError;
use crate::state::Operation;
use serde::{Deserialize, Serialize};

/// Supported UI locales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Armenian (production default).
    #[default]
    Hy,
    /// English.
    En,
}

impl std::str::FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hy" | "hy-am" => Ok(Self::Hy),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            _ => Err(ConfigError::InvalidLocale(s.to_string())),
        }
    }
}

/// Success messages for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    /// Shown after a successful login.
    pub login_success: &'static str,
    /// Shown after a successful registration.
    pub register_success: &'static str,
}

impl Messages {
    /// Armenian strings.
    pub const HY: Self = Self {
        login_success: "Բարի գալուստ Gurubook",
        register_success: "Ձեր անձնական հաշիվը հաջողությամբ ստեղծվել է",
    };

    /// English strings.
    pub const EN: Self = Self {
        login_success: "Welcome to Gurubook",
        register_success: "Your personal account has been created successfully",
    };

    /// Messages for `locale`.
    #[must_use]
    pub const fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Hy => Self::HY,
            Locale::En => Self::EN,
        }
    }

    /// Success message for `operation`.
    ///
    /// Password reset flows succeed silently.
    #[must_use]
    pub const fn success(&self, operation: Operation) -> Option<&'static str> {
        match operation {
            Operation::Login => Some(self.login_success),
            Operation::Register => Some(self.register_success),
            Operation::ResetPassword | Operation::SetNewPassword => None,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::HY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_codes() {
        assert_eq!("HY".parse::<Locale>(), Ok(Locale::Hy));
        assert_eq!(" en-US ".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(ConfigError::InvalidLocale("fr".to_string()))
        );
    }

    #[test]
    fn login_and_register_have_distinct_messages() {
        for locale in [Locale::Hy, Locale::En] {
            let messages = Messages::for_locale(locale);
            assert_ne!(
                messages.success(Operation::Login),
                messages.success(Operation::Register)
            );
            assert_eq!(messages.success(Operation::ResetPassword), None);
            assert_eq!(messages.success(Operation::SetNewPassword), None);
        }
    }

    #[test]
    fn armenian_is_the_default() {
        assert_eq!(Messages::default().login_success, "Բարի գալուստ Gurubook");
    }
}
