//! Named policy constants.
//!
//! Replay windows and credential lifetimes are defined once here. Configuration
//! defaults read from these constants; nothing else in the workspace hardcodes
//! a duration.

use chrono::Duration;

/// Maximum age of an init-data payload, in seconds.
pub const REPLAY_WINDOW_SECONDS: u64 = 24 * 60 * 60;

/// Tolerated clock skew for init-data stamped in the future, in seconds.
pub const MAX_FUTURE_SKEW_SECONDS: u64 = 30;

/// Session lifetime for platform staff, in hours.
pub const STAFF_TTL_HOURS: u64 = 24;

/// Session lifetime for tenant owners, in hours.
pub const TENANT_OWNER_TTL_HOURS: u64 = 7 * 24;

/// Session lifetime for members and unresolved roles, in hours.
pub const FALLBACK_TTL_HOURS: u64 = 30 * 24;

/// Longest session lifetime a configuration may request, in hours (ten years).
pub const MAX_TTL_HOURS: u64 = 10 * 365 * 24;

/// Longest replay window or skew tolerance a configuration may request, in seconds.
pub const MAX_WINDOW_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Key used to derive the init-data secret key from a bot token.
pub const INIT_DATA_KEY_SALT: &[u8] = b"WebAppData";

/// Extra attempts made when the stamp store read fails transiently.
pub const STAMP_READ_RETRIES: u32 = 3;

/// Base backoff between stamp store read attempts, in milliseconds.
pub const STAMP_RETRY_BACKOFF_MS: u64 = 25;

/// Placeholder secret shipped in sample configuration; refused at startup.
pub const PLACEHOLDER_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Converts configured hours into a lifetime, clamped to [`MAX_TTL_HOURS`].
pub fn ttl_from_hours(hours: u64) -> Duration {
    Duration::hours(clamped(hours, MAX_TTL_HOURS))
}

/// Converts configured seconds into a window, clamped to [`MAX_WINDOW_SECONDS`].
pub fn window_from_seconds(seconds: u64) -> Duration {
    Duration::seconds(clamped(seconds, MAX_WINDOW_SECONDS))
}

fn clamped(value: u64, max: u64) -> i64 {
    i64::try_from(value.min(max)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_clamp_out_of_range_values() {
        assert_eq!(ttl_from_hours(STAFF_TTL_HOURS), Duration::hours(24));
        assert_eq!(ttl_from_hours(u64::MAX), Duration::hours(MAX_TTL_HOURS as i64));
        assert_eq!(
            window_from_seconds(u64::MAX),
            Duration::seconds(MAX_WINDOW_SECONDS as i64)
        );
    }
}
