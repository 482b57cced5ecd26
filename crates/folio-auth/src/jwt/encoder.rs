//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use folio_core::config::AuthConfig;
use folio_core::error::AppError;

use super::claims::{ADMIN_SUBJECT, Claims};

/// Creates signed admin tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: i64::try_from(config.token_ttl_minutes).unwrap_or(i64::MAX / 60),
        }
    }

    /// Issues a fresh admin token with a unique `jti`.
    pub fn generate_token(&self) -> Result<(String, Claims), AppError> {
        let now = Utc::now();
        let exp: DateTime<Utc> = now + chrono::Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode admin token: {e}")))?;
        Ok((token, claims))
    }
}
