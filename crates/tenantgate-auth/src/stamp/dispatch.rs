//! Backend selection for the stamp store.

use async_trait::async_trait;
use tracing::info;

use tenantgate_core::config::{StampStoreConfig, StampStoreProvider};
use tenantgate_core::error::AppError;
use tenantgate_core::traits::SecurityStampStore;
use tenantgate_core::types::{IdentityId, Stamp};

use super::memory::MemoryStampStore;
#[cfg(feature = "redis-stamp")]
use super::redis::RedisStampStore;

/// Dispatcher for stamp store backends.
///
/// Switches between in-memory and Redis storage based on configuration.
#[derive(Debug, Clone)]
pub enum StampStoreDispatch {
    /// In-memory store (single node).
    Memory(MemoryStampStore),
    /// Redis store (multi-node).
    #[cfg(feature = "redis-stamp")]
    Redis(RedisStampStore),
}

impl StampStoreDispatch {
    /// Builds the configured backend.
    pub async fn from_config(config: &StampStoreConfig) -> Result<Self, AppError> {
        match config.provider {
            StampStoreProvider::Memory => {
                info!("Using in-memory stamp store");
                Ok(Self::Memory(MemoryStampStore::new()))
            }
            #[cfg(feature = "redis-stamp")]
            StampStoreProvider::Redis => {
                let url = config.redis_url.as_deref().ok_or_else(|| {
                    AppError::configuration("stamp_store.redis_url is required for redis")
                })?;
                let store = RedisStampStore::new(url, &config.key_prefix).await?;
                Ok(Self::Redis(store))
            }
            #[cfg(not(feature = "redis-stamp"))]
            StampStoreProvider::Redis => Err(AppError::configuration(
                "Redis stamp store requested but the 'redis-stamp' feature is disabled",
            )),
        }
    }
}

#[async_trait]
impl SecurityStampStore for StampStoreDispatch {
    async fn read(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        match self {
            Self::Memory(inner) => inner.read(identity_id).await,
            #[cfg(feature = "redis-stamp")]
            Self::Redis(inner) => inner.read(identity_id).await,
        }
    }

    async fn rotate(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        match self {
            Self::Memory(inner) => inner.rotate(identity_id).await,
            #[cfg(feature = "redis-stamp")]
            Self::Redis(inner) => inner.rotate(identity_id).await,
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        match self {
            Self::Memory(inner) => inner.health_check().await,
            #[cfg(feature = "redis-stamp")]
            Self::Redis(inner) => inner.health_check().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_from_default_config() {
        let store = StampStoreDispatch::from_config(&StampStoreConfig::default())
            .await
            .expect("memory store");
        assert!(matches!(store, StampStoreDispatch::Memory(_)));
        assert!(store.health_check().await.expect("health"));
    }
}
