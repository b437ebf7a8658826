//! Role canonicalisation, capability tiers, and the lifetime policy table.

pub mod resolver;
pub mod tier;

pub use resolver::{RoleGrant, RoleResolver};
pub use tier::CapabilityTier;
