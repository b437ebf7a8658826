//! The principal a credential is issued to.

use serde::{Deserialize, Serialize};

use tenantgate_core::types::{IdentityId, TenantId};

/// An authenticated principal, as returned by the identity/tenant repository
/// for a verified external user.
///
/// The identity's current stamp is not carried here; it lives in the
/// [`SecurityStampStore`](tenantgate_core::traits::SecurityStampStore) and is
/// read at issuance and verification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Internal identity id.
    pub identity_id: IdentityId,
    /// Chat-host user id the identity was resolved from.
    pub external_user_id: i64,
    /// Role string as stored (any case or separator style).
    pub role: String,
    /// Tenant the identity acts for, if any.
    pub tenant_id: Option<TenantId>,
}

impl Identity {
    /// Creates an identity record.
    pub fn new(
        identity_id: IdentityId,
        external_user_id: i64,
        role: impl Into<String>,
        tenant_id: Option<TenantId>,
    ) -> Self {
        Self {
            identity_id,
            external_user_id,
            role: role.into(),
            tenant_id,
        }
    }
}
