//! # tenantgate-auth
//!
//! Identity and session security for TenantGate.
//!
//! ## Modules
//!
//! - `init_data` — verification of the chat host's signed identity payload
//! - `token` — session claims and their HS256 signing/verification
//! - `stamp` — per-identity security stamp storage (memory or Redis)
//! - `session` — issuance, verification, heartbeat renewal, revocation
//! - `role` — role canonicalisation, capability tiers, lifetime policy

pub mod init_data;
pub mod role;
pub mod session;
pub mod stamp;
pub mod token;

pub use init_data::{InitDataVerifier, VerifiedUser};
pub use role::{CapabilityTier, RoleResolver};
pub use session::{AuthenticatedContext, Identity, IssuedCredential, SessionLifecycleManager};
pub use stamp::{MemoryStampStore, StampStoreDispatch};
pub use token::{SessionClaims, SessionTokenService};
