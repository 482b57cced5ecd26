//! The admin login facade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use folio_core::config::AuthConfig;
use folio_core::error::AppError;
use folio_core::result::AppResult;

use crate::jwt::{Claims, JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;

/// A freshly issued admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminToken {
    /// Signed bearer token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Verifies the admin password and manages the resulting tokens.
#[derive(Debug, Clone)]
pub struct AdminAuthenticator {
    hasher: PasswordHasher,
    password_hash: String,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl AdminAuthenticator {
    /// Creates an authenticator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        if config.admin_password_hash.is_empty() {
            warn!("auth.admin_password_hash is empty; admin login is disabled");
        }
        Self {
            hasher: PasswordHasher::new(),
            password_hash: config.admin_password_hash.clone(),
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }

    /// Whether a password hash is configured.
    pub fn is_enabled(&self) -> bool {
        !self.password_hash.is_empty()
    }

    /// Exchanges the admin password for a token.
    pub fn login(&self, password: &str) -> AppResult<AdminToken> {
        if !self.is_enabled() {
            return Err(AppError::configuration("Admin login is not configured"));
        }
        if !self.hasher.verify_password(password, &self.password_hash)? {
            warn!("Rejected admin login");
            return Err(AppError::authentication("Invalid password"));
        }

        let (token, claims) = self.encoder.generate_token()?;
        info!(jti = %claims.jti, "Admin logged in");
        Ok(AdminToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Validates a bearer token.
    pub async fn authenticate(&self, token: &str) -> AppResult<Claims> {
        self.decoder.decode_token(token).await
    }

    /// Revokes a token so it is rejected for the rest of its lifetime.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let claims = self.decoder.decode_token(token).await?;
        self.decoder.blocklist_token(claims.jti).await;
        info!(jti = %claims.jti, "Admin logged out");
        Ok(())
    }
}
