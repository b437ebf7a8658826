//! Session token configuration.

use serde::{Deserialize, Serialize};

use crate::policy::{FALLBACK_TTL_HOURS, PLACEHOLDER_SECRET, STAFF_TTL_HOURS, TENANT_OWNER_TTL_HOURS};

/// Signing secret and tiered lifetime policy for session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key for token signing (HMAC-SHA256).
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Token lifetime for staff roles, in hours.
    #[serde(default = "default_staff_ttl")]
    pub staff_ttl_hours: u64,
    /// Token lifetime for tenant owners, in hours.
    #[serde(default = "default_tenant_owner_ttl")]
    pub tenant_owner_ttl_hours: u64,
    /// Token lifetime for members and unrecognised roles, in hours.
    #[serde(default = "default_fallback_ttl")]
    pub fallback_ttl_hours: u64,
    /// Role strings that resolve to the staff tier (after canonicalisation).
    #[serde(default = "default_staff_roles")]
    pub staff_roles: Vec<String>,
    /// Role strings that resolve to the tenant-owner tier (after canonicalisation).
    #[serde(default = "default_tenant_owner_roles")]
    pub tenant_owner_roles: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            staff_ttl_hours: default_staff_ttl(),
            tenant_owner_ttl_hours: default_tenant_owner_ttl(),
            fallback_ttl_hours: default_fallback_ttl(),
            staff_roles: default_staff_roles(),
            tenant_owner_roles: default_tenant_owner_roles(),
        }
    }
}

fn default_token_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}

fn default_staff_ttl() -> u64 {
    STAFF_TTL_HOURS
}

fn default_tenant_owner_ttl() -> u64 {
    TENANT_OWNER_TTL_HOURS
}

fn default_fallback_ttl() -> u64 {
    FALLBACK_TTL_HOURS
}

fn default_staff_roles() -> Vec<String> {
    ["staff", "admin", "super_admin", "superadmin", "platform_admin", "support"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_tenant_owner_roles() -> Vec<String> {
    ["tenant_owner", "owner", "tenant_admin"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
