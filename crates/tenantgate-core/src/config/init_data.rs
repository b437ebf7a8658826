//! Init-data verification configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::policy::{MAX_FUTURE_SKEW_SECONDS, REPLAY_WINDOW_SECONDS};

/// Secrets and freshness policy for inbound init-data payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitDataConfig {
    /// Platform-wide bot token, used when no tenant is named.
    #[serde(default)]
    pub platform_bot_token: Option<String>,
    /// Per-tenant bot tokens keyed by tenant id.
    #[serde(default)]
    pub tenant_bot_tokens: HashMap<String, String>,
    /// Maximum payload age in seconds.
    #[serde(default = "default_replay_window")]
    pub replay_window_seconds: u64,
    /// Tolerated future skew of `auth_date` in seconds.
    #[serde(default = "default_future_skew")]
    pub max_future_skew_seconds: u64,
}

impl Default for InitDataConfig {
    fn default() -> Self {
        Self {
            platform_bot_token: None,
            tenant_bot_tokens: HashMap::new(),
            replay_window_seconds: default_replay_window(),
            max_future_skew_seconds: default_future_skew(),
        }
    }
}

fn default_replay_window() -> u64 {
    REPLAY_WINDOW_SECONDS
}

fn default_future_skew() -> u64 {
    MAX_FUTURE_SKEW_SECONDS
}
