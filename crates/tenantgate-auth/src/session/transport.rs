//! Transport-security attributes returned alongside a credential.
//!
//! The core never sets cookies or headers itself; callers apply these.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use tenantgate_core::config::TransportConfig;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// Sent on cross-site requests; requires `Secure`.
    None,
    /// Sent on top-level navigations.
    Lax,
    /// Same-site requests only.
    Strict,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Lax => write!(f, "Lax"),
            Self::Strict => write!(f, "Strict"),
        }
    }
}

/// How the caller must deliver a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportAttributes {
    /// Cookie name.
    pub cookie_name: String,
    /// Credential lifetime in seconds from issuance.
    pub max_age_seconds: i64,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Restrict to secure transports.
    pub secure: bool,
    /// Hide from client-side scripts.
    pub http_only: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
    /// Whether the credential has to survive cross-site delivery.
    pub cross_site: bool,
}

impl TransportAttributes {
    /// Derives attributes for a credential living `ttl` from `issued_at`.
    ///
    /// Cross-site delivery forces `SameSite=None` together with `Secure`.
    pub fn for_credential(
        config: &TransportConfig,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let (same_site, secure) = if config.cross_site {
            (SameSite::None, true)
        } else {
            (SameSite::Lax, config.secure)
        };

        Self {
            cookie_name: config.cookie_name.clone(),
            max_age_seconds: ttl.num_seconds(),
            expires_at: issued_at + ttl,
            secure,
            http_only: config.http_only,
            same_site,
            cross_site: config.cross_site,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_site_forces_secure_none() {
        let config = TransportConfig {
            secure: false,
            ..TransportConfig::default()
        };
        let attrs = TransportAttributes::for_credential(&config, Utc::now(), Duration::hours(1));
        assert_eq!(attrs.same_site, SameSite::None);
        assert!(attrs.secure);
        assert_eq!(attrs.max_age_seconds, 3600);
    }

    #[test]
    fn test_same_site_delivery_is_lax() {
        let config = TransportConfig {
            cross_site: false,
            secure: false,
            ..TransportConfig::default()
        };
        let attrs = TransportAttributes::for_credential(&config, Utc::now(), Duration::hours(1));
        assert_eq!(attrs.same_site, SameSite::Lax);
        assert!(!attrs.secure);
    }
}
