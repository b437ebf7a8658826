//! Session lifecycle: issuance, verification, heartbeat renewal, and
//! stamp-based revocation.

pub mod context;
pub mod identity;
pub mod manager;
pub mod transport;

pub use context::{AuthenticatedContext, IssuedCredential};
pub use identity::Identity;
pub use manager::{SessionLifecycleManager, StampReadPolicy};
pub use transport::{SameSite, TransportAttributes};
