//! Core type definitions used across the TenantGate workspace.

pub mod id;
pub mod stamp;

pub use id::{IdentityId, TenantId};
pub use stamp::Stamp;
