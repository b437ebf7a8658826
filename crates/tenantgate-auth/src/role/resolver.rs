//! Role string resolution.
//!
//! Role strings arrive from external storage in mixed case and format
//! (`"Tenant_Owner"`, `"tenant-owner"`, `" ADMIN "`). This is the single place
//! they are canonicalised; everything downstream works with
//! [`CapabilityTier`] and the canonical role string.

use std::collections::HashSet;

use chrono::Duration;

use tenantgate_core::config::SessionConfig;
use tenantgate_core::policy;

use super::tier::CapabilityTier;

/// Outcome of resolving a role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    /// Canonical role string (trimmed, lowercase, `_`-separated).
    pub role: String,
    /// Capability tier.
    pub tier: CapabilityTier,
    /// Credential lifetime for this tier.
    pub ttl: Duration,
}

/// Maps role strings to capability tiers and credential lifetimes.
#[derive(Debug, Clone)]
pub struct RoleResolver {
    /// Match keys of roles resolving to `Staff`.
    staff_roles: HashSet<String>,
    /// Match keys of roles resolving to `TenantOwner`.
    tenant_owner_roles: HashSet<String>,
    /// Lifetime for staff credentials.
    staff_ttl: Duration,
    /// Lifetime for tenant-owner credentials.
    tenant_owner_ttl: Duration,
    /// Lifetime for members and unresolved roles.
    fallback_ttl: Duration,
}

impl RoleResolver {
    /// Creates a resolver from the session configuration's policy table.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            staff_roles: config.staff_roles.iter().map(|r| match_key(r)).collect(),
            tenant_owner_roles: config
                .tenant_owner_roles
                .iter()
                .map(|r| match_key(r))
                .collect(),
            staff_ttl: policy::ttl_from_hours(config.staff_ttl_hours),
            tenant_owner_ttl: policy::ttl_from_hours(config.tenant_owner_ttl_hours),
            fallback_ttl: policy::ttl_from_hours(config.fallback_ttl_hours),
        }
    }

    /// Resolves a role string into its tier and lifetime.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace and
    /// separator style. Anything unrecognised resolves to `Member` with the
    /// fallback lifetime.
    pub fn resolve(&self, role: &str) -> RoleGrant {
        let key = match_key(role);
        let tier = if self.staff_roles.contains(&key) {
            CapabilityTier::Staff
        } else if self.tenant_owner_roles.contains(&key) {
            CapabilityTier::TenantOwner
        } else {
            CapabilityTier::Member
        };

        RoleGrant {
            role: canonical_role(role),
            tier,
            ttl: self.ttl_for(tier),
        }
    }

    /// Returns the credential lifetime for a tier.
    pub fn ttl_for(&self, tier: CapabilityTier) -> Duration {
        match tier {
            CapabilityTier::Staff => self.staff_ttl,
            CapabilityTier::TenantOwner => self.tenant_owner_ttl,
            CapabilityTier::Member => self.fallback_ttl,
        }
    }
}

impl Default for RoleResolver {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

/// Canonical internal representation: trimmed, lowercase, words joined by `_`.
pub fn canonical_role(role: &str) -> String {
    role.trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Separator-insensitive key, so `TenantOwner` and `tenant_owner` collide.
fn match_key(role: &str) -> String {
    role.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
