//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field defaults to the matching constant in
//! [`crate::policy`].

pub mod init_data;
pub mod logging;
pub mod session;
pub mod stamp_store;
pub mod transport;

use serde::{Deserialize, Serialize};

pub use self::init_data::InitDataConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::stamp_store::{StampStoreConfig, StampStoreProvider};
pub use self::transport::TransportConfig;

use crate::error::AppError;
use crate::policy::{MAX_TTL_HOURS, MAX_WINDOW_SECONDS, PLACEHOLDER_SECRET};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Init-data verification settings.
    #[serde(default)]
    pub init_data: InitDataConfig,
    /// Session token settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Security stamp store settings.
    #[serde(default)]
    pub stamp_store: StampStoreConfig,
    /// Transport-security attributes returned with credentials.
    #[serde(default)]
    pub transport: TransportConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; values are overlaid by environment variables
    /// prefixed with `TENANTGATE` (sections separated by `__`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TENANTGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Rejects configurations that would run with unsafe secrets or windows.
    pub fn validate(&self) -> Result<(), AppError> {
        let secret = self.session.token_secret.trim();
        if secret.is_empty() || secret == PLACEHOLDER_SECRET {
            return Err(AppError::configuration(
                "session.token_secret must be set to a non-placeholder value",
            ));
        }
        if self.init_data.replay_window_seconds == 0 {
            return Err(AppError::configuration(
                "init_data.replay_window_seconds must be greater than zero",
            ));
        }
        if self.init_data.replay_window_seconds > MAX_WINDOW_SECONDS
            || self.init_data.max_future_skew_seconds > MAX_WINDOW_SECONDS
        {
            return Err(AppError::configuration(format!(
                "init_data windows must not exceed {MAX_WINDOW_SECONDS} seconds"
            )));
        }
        for (name, hours) in [
            ("staff_ttl_hours", self.session.staff_ttl_hours),
            ("tenant_owner_ttl_hours", self.session.tenant_owner_ttl_hours),
            ("fallback_ttl_hours", self.session.fallback_ttl_hours),
        ] {
            if hours == 0 || hours > MAX_TTL_HOURS {
                return Err(AppError::configuration(format!(
                    "session.{name} must be between 1 and {MAX_TTL_HOURS}"
                )));
            }
        }
        if self.init_data.platform_bot_token.is_none() && self.init_data.tenant_bot_tokens.is_empty()
        {
            return Err(AppError::configuration(
                "At least one of init_data.platform_bot_token or init_data.tenant_bot_tokens is required",
            ));
        }
        if self.stamp_store.provider == StampStoreProvider::Redis
            && self.stamp_store.redis_url.is_none()
        {
            return Err(AppError::configuration(
                "stamp_store.redis_url is required when provider = \"redis\"",
            ));
        }
        Ok(())
    }
}
