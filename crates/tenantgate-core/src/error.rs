//! Unified application error types for TenantGate.
//!
//! Every component returns [`AppError`] as an explicit result value. The
//! [`ErrorKind`] carries the authentication failure taxonomy together with the
//! propagation policy callers must apply to each failure.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the entire workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The init-data payload is missing `hash`/`auth_date`/`user` or cannot be parsed.
    MalformedPayload,
    /// The init-data hash does not match the recomputed HMAC.
    SignatureMismatch,
    /// The init-data `auth_date` is older than the replay window.
    ReplayWindowExceeded,
    /// The session token is structurally invalid.
    TokenMalformed,
    /// The session token signature does not verify.
    InvalidSignature,
    /// The session token is past its expiry.
    TokenExpired,
    /// The token stamp no longer matches the identity's current stamp.
    Revoked,
    /// Role or tenant resolution did not authorize the identity.
    IdentityNotAuthorized,
    /// The security stamp store could not be reached.
    StoreUnavailable,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether the failed operation may be retried with backoff.
    ///
    /// Only transient stamp store failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable)
    }

    /// Whether the caller should prompt the user to authenticate again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::ReplayWindowExceeded | Self::TokenExpired)
    }

    /// Whether the client must discard the credential it presented.
    pub fn requires_credential_discard(&self) -> bool {
        matches!(
            self,
            Self::Revoked | Self::InvalidSignature | Self::TokenMalformed
        )
    }

    /// Whether the failure indicates tampering or a programming error.
    pub fn is_tampering(&self) -> bool {
        matches!(
            self,
            Self::SignatureMismatch | Self::InvalidSignature | Self::TokenMalformed
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPayload => write!(f, "MALFORMED_PAYLOAD"),
            Self::SignatureMismatch => write!(f, "SIGNATURE_MISMATCH"),
            Self::ReplayWindowExceeded => write!(f, "REPLAY_WINDOW_EXCEEDED"),
            Self::TokenMalformed => write!(f, "TOKEN_MALFORMED"),
            Self::InvalidSignature => write!(f, "INVALID_SIGNATURE"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::Revoked => write!(f, "REVOKED"),
            Self::IdentityNotAuthorized => write!(f, "IDENTITY_NOT_AUTHORIZED"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout TenantGate.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a malformed-payload error.
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPayload, message)
    }

    /// Create a signature-mismatch error.
    pub fn signature_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignatureMismatch, message)
    }

    /// Create a replay-window error.
    pub fn replay_window_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReplayWindowExceeded, message)
    }

    /// Create a malformed-token error.
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenMalformed, message)
    }

    /// Create an invalid-signature error.
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSignature, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a revoked error.
    pub fn revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Revoked, message)
    }

    /// Create an identity-not-authorized error.
    pub fn identity_not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IdentityNotAuthorized, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Shorthand for `self.kind.is_retryable()`.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        Self::with_source(
            ErrorKind::StoreUnavailable,
            format!("Stamp store error: {err}"),
            err,
        )
    }
}
