//! Security stamp storage.
//!
//! Provides the per-identity revocation stamp using either:
//! - a sharded in-memory map (single-node deployments and tests)
//! - Redis with Lua scripts (multi-node deployments)

pub mod dispatch;
pub mod memory;
#[cfg(feature = "redis-stamp")]
pub mod redis;

pub use dispatch::StampStoreDispatch;
pub use memory::MemoryStampStore;
#[cfg(feature = "redis-stamp")]
pub use self::redis::RedisStampStore;
