//! Session token signing and verification.
//!
//! Tokens are compact JWS strings (HS256): the serialized claims plus their
//! MAC. Verification needs no server-side lookup; stamp comparison happens one
//! layer up in the lifecycle manager.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use tenantgate_core::config::SessionConfig;
use tenantgate_core::error::AppError;
use tenantgate_core::traits::ClockSource;

use super::claims::SessionClaims;

/// Signs and verifies session claims.
#[derive(Clone)]
pub struct SessionTokenService {
    /// HMAC key for signing.
    encoding_key: EncodingKey,
    /// HMAC key for verification.
    decoding_key: DecodingKey,
    /// Signature validation settings; expiry is checked against `clock`.
    validation: Validation,
    /// Time source for expiry checks.
    clock: Arc<dyn ClockSource>,
}

impl std::fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("validation", &self.validation)
            .field("clock", &self.clock)
            .finish()
    }
}

impl SessionTokenService {
    /// Creates a token service from session configuration.
    pub fn new(config: &SessionConfig, clock: Arc<dyn ClockSource>) -> Self {
        Self::from_secret(config.token_secret.as_bytes(), clock)
    }

    /// Creates a token service from a raw signing secret.
    pub fn from_secret(secret: &[u8], clock: Arc<dyn ClockSource>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the injected clock, not the OS clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = ["exp", "sub"]
            .iter()
            .map(|c| c.to_string())
            .collect::<HashSet<_>>();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Signs claims into a token string.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
    }

    /// Verifies signature and expiry at the clock's current time.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        self.verify_at(token, self.clock.now())
    }

    /// Verifies signature and expiry at an explicit instant.
    ///
    /// Checks, in order:
    /// 1. Structure and signature
    /// 2. Timestamp sanity (`iat < exp`)
    /// 3. `now < exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AppError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    AppError::invalid_signature("Invalid token signature")
                }
                JwtErrorKind::ExpiredSignature => AppError::token_expired("Token has expired"),
                _ => AppError::token_malformed(format!("Invalid token format: {e}")),
            })?;

        let claims = token_data.claims;

        if claims.exp <= claims.iat {
            return Err(AppError::token_malformed(
                "Token expiry does not follow its issue time",
            ));
        }

        if claims.is_expired_at(now) {
            return Err(AppError::token_expired("Token has expired"));
        }

        Ok(claims)
    }

    /// Returns the clock used for expiry checks.
    pub fn clock(&self) -> &Arc<dyn ClockSource> {
        &self.clock
    }
}
