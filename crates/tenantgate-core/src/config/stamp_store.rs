//! Security stamp store configuration.

use serde::{Deserialize, Serialize};

use crate::policy::{STAMP_READ_RETRIES, STAMP_RETRY_BACKOFF_MS};

/// Backend holding the per-identity revocation stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampStoreProvider {
    /// Process-local map; single-node deployments and tests.
    #[default]
    Memory,
    /// Redis, shared across nodes.
    Redis,
}

/// Stamp store backend and read retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampStoreConfig {
    /// Which backend to use.
    #[serde(default)]
    pub provider: StampStoreProvider,
    /// Redis connection URL (required for the redis provider).
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Prefix for stamp keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Extra read attempts after a transient failure.
    #[serde(default = "default_read_retries")]
    pub read_retries: u32,
    /// Base backoff between read attempts, doubled each retry.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for StampStoreConfig {
    fn default() -> Self {
        Self {
            provider: StampStoreProvider::default(),
            redis_url: None,
            key_prefix: default_key_prefix(),
            read_retries: default_read_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_key_prefix() -> String {
    "tenantgate:stamp:".to_string()
}

fn default_read_retries() -> u32 {
    STAMP_READ_RETRIES
}

fn default_retry_backoff() -> u64 {
    STAMP_RETRY_BACKOFF_MS
}
