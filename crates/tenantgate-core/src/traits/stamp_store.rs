//! Security stamp store trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{IdentityId, Stamp};

/// Holds exactly one current revocation stamp per identity.
///
/// Implementations must guarantee:
/// - `read` observes the latest completed `rotate` for the same identity and
///   never serves a cached value.
/// - `rotate` is linearizable per identity: it replaces the stamp wholesale, so
///   concurrent rotations converge on a single final value.
/// - An identity with no stamp yet gets one created atomically on first `read`;
///   concurrent first reads agree on the same value.
///
/// Transient backend failures surface as `ErrorKind::StoreUnavailable`.
#[async_trait]
pub trait SecurityStampStore: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the identity's current stamp, creating one if none exists.
    async fn read(&self, identity_id: &IdentityId) -> AppResult<Stamp>;

    /// Replaces the identity's stamp with a fresh value and returns it.
    async fn rotate(&self, identity_id: &IdentityId) -> AppResult<Stamp>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
