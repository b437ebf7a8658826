//! In-memory stamp store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};

use tenantgate_core::error::AppError;
use tenantgate_core::traits::SecurityStampStore;
use tenantgate_core::types::{IdentityId, Stamp};

/// Stamp store backed by a sharded concurrent map.
///
/// Each read-or-create and each rotation runs under the owning shard's lock,
/// which makes both atomic per identity without a store-wide lock.
/// Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStampStore {
    /// Current stamp per identity.
    stamps: Arc<DashMap<IdentityId, Stamp>>,
}

impl MemoryStampStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities holding a stamp.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Whether no identity holds a stamp yet.
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[async_trait]
impl SecurityStampStore for MemoryStampStore {
    async fn read(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        let entry = self.stamps.entry(*identity_id).or_insert_with(|| {
            debug!(identity_id = %identity_id, "Initialising security stamp");
            Stamp::generate()
        });
        Ok(entry.value().clone())
    }

    async fn rotate(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        let stamp = Stamp::generate();
        self.stamps.insert(*identity_id, stamp.clone());
        info!(identity_id = %identity_id, "Security stamp rotated");
        Ok(stamp)
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_is_stable_until_rotated() {
        let store = MemoryStampStore::new();
        let id = IdentityId::new();

        let first = store.read(&id).await.expect("read");
        assert_eq!(store.read(&id).await.expect("read"), first);

        let rotated = store.rotate(&id).await.expect("rotate");
        assert_ne!(rotated, first);
        assert_eq!(store.read(&id).await.expect("read"), rotated);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let store = MemoryStampStore::new();
        let a = IdentityId::new();
        let b = IdentityId::new();

        let b_stamp = store.read(&b).await.expect("read");
        store.rotate(&a).await.expect("rotate");
        assert_eq!(store.read(&b).await.expect("read"), b_stamp);
    }
}
