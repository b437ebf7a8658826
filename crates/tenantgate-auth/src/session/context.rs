//! Results of issuance and verification.

use serde::{Deserialize, Serialize};

use tenantgate_core::error::AppError;
use tenantgate_core::types::{IdentityId, TenantId};

use crate::role::CapabilityTier;
use crate::token::SessionClaims;

use super::transport::TransportAttributes;

/// A freshly signed credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedCredential {
    /// Opaque token string.
    pub token: String,
    /// Decoded claims of `token`.
    pub claims: SessionClaims,
    /// Tier resolved from the role.
    pub tier: CapabilityTier,
    /// Delivery attributes the caller applies.
    pub transport: TransportAttributes,
}

/// The outcome of verifying a credential on a protected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedContext {
    /// Verified claims.
    pub claims: SessionClaims,
    /// Tier resolved from the claims' role.
    pub tier: CapabilityTier,
}

impl AuthenticatedContext {
    /// The authenticated identity.
    pub fn identity_id(&self) -> IdentityId {
        self.claims.sub
    }

    /// The tenant scope of the credential.
    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.claims.tid.as_ref()
    }

    /// Fails with `IdentityNotAuthorized` unless the tier is at least `minimum`.
    pub fn require_tier(&self, minimum: CapabilityTier) -> Result<(), AppError> {
        if self.tier.has_at_least(&minimum) {
            Ok(())
        } else {
            Err(AppError::identity_not_authorized(format!(
                "Tier '{}' is insufficient; minimum required: '{minimum}'",
                self.tier
            )))
        }
    }

    /// Whether the credential may act within `tenant`. Staff act in every tenant.
    pub fn in_tenant(&self, tenant: &TenantId) -> bool {
        self.tier.is_staff() || self.claims.tid.as_ref() == Some(tenant)
    }
}
