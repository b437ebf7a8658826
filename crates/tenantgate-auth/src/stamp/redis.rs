//! Redis-backed stamp store using Lua scripts for atomicity.
//!
//! Suitable for multi-node deployments. Every call goes to Redis; nothing is
//! cached locally.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::info;

use tenantgate_core::error::AppError;
use tenantgate_core::traits::SecurityStampStore;
use tenantgate_core::types::{IdentityId, Stamp};

/// Lua script for atomic read-or-initialise.
///
/// KEYS[1] = stamp key
/// ARGV[1] = candidate stamp, stored only if the key is absent
///
/// Returns the stamp now stored under the key.
const READ_SCRIPT: &str = r#"
    local current = redis.call('GET', KEYS[1])
    if current then
        return current
    end
    redis.call('SET', KEYS[1], ARGV[1])
    return ARGV[1]
"#;

/// Redis-based stamp store.
#[derive(Debug, Clone)]
pub struct RedisStampStore {
    /// Redis connection manager.
    pool: redis::aio::ConnectionManager,
    /// Prefix prepended to every identity key.
    key_prefix: String,
}

impl RedisStampStore {
    /// Connects to Redis.
    pub async fn new(redis_url: &str, key_prefix: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::configuration(format!("Invalid Redis URL: {e}")))?;

        let pool = client.get_connection_manager().await?;

        info!(key_prefix = %key_prefix, "Redis stamp store initialized");

        Ok(Self {
            pool,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, identity_id: &IdentityId) -> String {
        format!("{}{}", self.key_prefix, identity_id)
    }
}

#[async_trait]
impl SecurityStampStore for RedisStampStore {
    async fn read(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        let mut conn = self.pool.clone();

        let stored: String = redis::Script::new(READ_SCRIPT)
            .key(self.key(identity_id))
            .arg(Stamp::generate().as_str())
            .invoke_async(&mut conn)
            .await?;

        Ok(Stamp::from_stored(stored))
    }

    async fn rotate(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        let mut conn = self.pool.clone();
        let stamp = Stamp::generate();

        // A single SET replaces the value wholesale; concurrent rotations
        // serialize in Redis and the last one wins.
        let _: () = conn.set(self.key(identity_id), stamp.as_str()).await?;

        info!(identity_id = %identity_id, "Security stamp rotated via Redis");
        Ok(stamp)
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        let mut conn = self.pool.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}
