//! Strength policy for a new admin password.

use folio_core::config::AuthConfig;
use folio_core::error::AppError;

/// Validates password strength before it is hashed into configuration.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Returns the first violation found, if any.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, &["folio", "admin", "portfolio"]);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_rejects_short() {
        assert!(validator().validate("a1!").is_err());
    }

    #[test]
    fn test_rejects_guessable() {
        assert!(validator().validate("password123").is_err());
        assert!(validator().validate("portfolio").is_err());
    }

    #[test]
    fn test_accepts_passphrase() {
        assert!(validator().validate("violet-harbour-tangent-91").is_ok());
    }
}
