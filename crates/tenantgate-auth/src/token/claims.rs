//! Claims payload embedded in every session token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use tenantgate_core::types::{IdentityId, Stamp, TenantId};

/// Signed session claims.
///
/// A token carrying these claims is valid iff its signature verifies, the
/// current time is before `exp`, and `stamp` equals the identity's current
/// stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (the identity ID).
    pub sub: IdentityId,
    /// Canonical role string at the time of issuance.
    pub role: String,
    /// Tenant scope, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tid: Option<TenantId>,
    /// Security stamp the token was signed against.
    pub stamp: Stamp,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl SessionClaims {
    /// Builds claims issued at `issued_at` and expiring `ttl` later.
    pub fn new(
        subject: IdentityId,
        role: impl Into<String>,
        tenant_id: Option<TenantId>,
        stamp: Stamp,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject,
            role: role.into(),
            tid: tenant_id,
            stamp,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Returns the identity ID from the subject claim.
    pub fn subject_id(&self) -> IdentityId {
        self.sub
    }

    /// Returns the tenant scope.
    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.tid.as_ref()
    }

    /// Returns the issued-at time as a `DateTime<Utc>`.
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_default()
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Checks whether the claims have expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Returns the remaining lifetime in seconds at `now` (0 if expired).
    pub fn remaining_ttl_seconds(&self, now: DateTime<Utc>) -> u64 {
        let remaining = self.exp - now.timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
        let claims = SessionClaims::new(
            IdentityId::new(),
            "member",
            None,
            Stamp::generate(),
            issued,
            Duration::seconds(60),
        );

        assert!(!claims.is_expired_at(issued + Duration::seconds(59)));
        assert!(claims.is_expired_at(issued + Duration::seconds(60)));
        assert_eq!(claims.remaining_ttl_seconds(issued + Duration::seconds(45)), 15);
        assert_eq!(claims.remaining_ttl_seconds(issued + Duration::seconds(90)), 0);
    }

    #[test]
    fn test_tenant_is_omitted_when_absent() {
        let claims = SessionClaims::new(
            IdentityId::new(),
            "staff",
            None,
            Stamp::generate(),
            Utc::now(),
            Duration::hours(1),
        );
        let json = serde_json::to_value(&claims).expect("serialize");
        assert!(json.get("tid").is_none());
    }
}
