//! JWT token validation and blocklist checking.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use moka::future::Cache;
use uuid::Uuid;

use folio_core::config::AuthConfig;
use folio_core::error::AppError;

use super::claims::{ADMIN_SUBJECT, Claims};

/// Seconds of clock skew tolerated on `exp`.
const LEEWAY_SECONDS: u64 = 5;

/// Validates admin tokens and tracks revoked token IDs.
///
/// Revoked IDs live in an in-process cache whose entries expire with the
/// token lifetime, after which the signature check alone rejects them.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Revoked JWT IDs.
    blocklist: Cache<Uuid, ()>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .field("revoked", &self.blocklist.entry_count())
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = LEEWAY_SECONDS;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let ttl = Duration::from_secs(config.token_ttl_minutes.saturating_mul(60) + LEEWAY_SECONDS);
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            blocklist: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Decodes and validates an admin token string.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Expiration
    /// 3. Subject is the admin
    /// 4. JTI not in blocklist
    pub async fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;
        let claims = token_data.claims;

        if claims.sub != ADMIN_SUBJECT {
            return Err(AppError::authentication("Token subject is not the admin"));
        }
        if self.blocklist.contains_key(&claims.jti) {
            return Err(AppError::authentication("Token has been revoked"));
        }
        Ok(claims)
    }

    /// Adds a JWT ID to the blocklist.
    pub async fn blocklist_token(&self, jti: Uuid) {
        self.blocklist.insert(jti, ()).await;
    }
}
