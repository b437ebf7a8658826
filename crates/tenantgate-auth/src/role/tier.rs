//! Capability tier enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse capability class derived from a role string.
///
/// Tiers are ordered by privilege level: Staff > TenantOwner > Member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTier {
    /// Platform staff; may act across tenants.
    Staff,
    /// Owner of a single tenant.
    TenantOwner,
    /// End user, or any role that did not resolve.
    Member,
}

impl CapabilityTier {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Staff => 3,
            Self::TenantOwner => 2,
            Self::Member => 1,
        }
    }

    /// Check if this tier has at least the given tier's privileges.
    pub fn has_at_least(&self, other: &CapabilityTier) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this tier is platform staff.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff)
    }

    /// Whether credentials of this tier must carry a tenant scope.
    pub fn requires_tenant(&self) -> bool {
        matches!(self, Self::TenantOwner)
    }

    /// Return the tier as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::TenantOwner => "tenant_owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(CapabilityTier::Staff.has_at_least(&CapabilityTier::TenantOwner));
        assert!(CapabilityTier::TenantOwner.has_at_least(&CapabilityTier::Member));
        assert!(CapabilityTier::Member.has_at_least(&CapabilityTier::Member));
        assert!(!CapabilityTier::Member.has_at_least(&CapabilityTier::TenantOwner));
    }

    #[test]
    fn test_only_tenant_owner_requires_tenant() {
        assert!(CapabilityTier::TenantOwner.requires_tenant());
        assert!(!CapabilityTier::Staff.requires_tenant());
        assert!(!CapabilityTier::Member.requires_tenant());
    }
}
