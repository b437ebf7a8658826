//! Init-data signature and freshness verification.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use tenantgate_core::config::InitDataConfig;
use tenantgate_core::error::AppError;
use tenantgate_core::policy::{self, INIT_DATA_KEY_SALT, MAX_FUTURE_SKEW_SECONDS};
use tenantgate_core::traits::ClockSource;
use tenantgate_core::types::TenantId;

use super::parser::{self, USER_FIELD};
use super::user::{InitDataUser, VerifiedUser};

type HmacSha256 = Hmac<Sha256>;

/// How old (or how far in the future) a payload may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    /// Maximum payload age; `now - auth_date > window` is rejected.
    pub window: Duration,
    /// Maximum tolerated `auth_date - now`.
    pub max_future_skew: Duration,
}

impl FreshnessPolicy {
    /// Builds a policy from configuration.
    pub fn from_config(config: &InitDataConfig) -> Self {
        Self {
            window: policy::window_from_seconds(config.replay_window_seconds),
            max_future_skew: policy::window_from_seconds(config.max_future_skew_seconds),
        }
    }
}

/// Bot tokens used as init-data secrets.
///
/// When a tenant is named only that tenant's token is consulted; an unknown
/// tenant never falls back to the platform token.
#[derive(Clone, Default)]
pub struct InitDataSecrets {
    /// Platform-wide token, used when no tenant is named.
    platform: Option<String>,
    /// Per-tenant tokens.
    tenants: HashMap<TenantId, String>,
}

impl std::fmt::Debug for InitDataSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitDataSecrets")
            .field("platform", &self.platform.is_some())
            .field("tenants", &self.tenants.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl InitDataSecrets {
    /// Creates a secret set.
    pub fn new(platform: Option<String>, tenants: HashMap<TenantId, String>) -> Self {
        Self { platform, tenants }
    }

    /// Loads secrets from configuration.
    pub fn from_config(config: &InitDataConfig) -> Self {
        Self {
            platform: config.platform_bot_token.clone(),
            tenants: config
                .tenant_bot_tokens
                .iter()
                .map(|(tenant, token)| (TenantId::new(tenant.clone()), token.clone()))
                .collect(),
        }
    }

    /// Resolves the secret for a tenant (or the platform when `None`).
    pub fn resolve(&self, tenant: Option<&TenantId>) -> Result<&[u8], AppError> {
        match tenant {
            Some(tenant) => self
                .tenants
                .get(tenant)
                .map(|token| token.as_bytes())
                .ok_or_else(|| {
                    AppError::identity_not_authorized(format!(
                        "No init data credential configured for tenant '{tenant}'"
                    ))
                }),
            None => self
                .platform
                .as_deref()
                .map(str::as_bytes)
                .ok_or_else(|| AppError::configuration("No platform init data credential configured")),
        }
    }
}

/// Verifies init-data payloads with configured secrets and an injected clock.
#[derive(Debug, Clone)]
pub struct InitDataVerifier {
    /// Bot tokens.
    secrets: InitDataSecrets,
    /// Replay window and skew tolerance.
    policy: FreshnessPolicy,
    /// Time source.
    clock: Arc<dyn ClockSource>,
}

impl InitDataVerifier {
    /// Creates a verifier.
    pub fn new(
        secrets: InitDataSecrets,
        policy: FreshnessPolicy,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        Self {
            secrets,
            policy,
            clock,
        }
    }

    /// Creates a verifier from configuration.
    pub fn from_config(config: &InitDataConfig, clock: Arc<dyn ClockSource>) -> Self {
        Self::new(
            InitDataSecrets::from_config(config),
            FreshnessPolicy::from_config(config),
            clock,
        )
    }

    /// Verifies a payload against the tenant's secret (or the platform's when
    /// `tenant` is `None`).
    pub fn verify(&self, raw: &str, tenant: Option<&TenantId>) -> Result<VerifiedUser, AppError> {
        let secret = self.secrets.resolve(tenant)?;
        let result = verify_with_policy(raw, secret, self.clock.now(), &self.policy);

        match &result {
            Ok(verified) => debug!(
                external_user_id = verified.external_user_id(),
                tenant = ?tenant.map(TenantId::as_str),
                "Init data verified"
            ),
            Err(e) => warn!(
                kind = %e.kind,
                tenant = ?tenant.map(TenantId::as_str),
                "Init data rejected"
            ),
        }

        result
    }
}

/// Verifies a payload with the given secret, instant, and replay window.
pub fn verify(
    raw: &str,
    secret: &[u8],
    now: DateTime<Utc>,
    window: Duration,
) -> Result<VerifiedUser, AppError> {
    let policy = FreshnessPolicy {
        window,
        max_future_skew: policy::window_from_seconds(MAX_FUTURE_SKEW_SECONDS),
    };
    verify_with_policy(raw, secret, now, &policy)
}

/// Verifies a payload under an explicit freshness policy.
///
/// 1. Parse and split off `hash`
/// 2. Recompute the MAC over the check-string and compare in constant time
/// 3. Enforce the replay window and future skew
/// 4. Decode the embedded user
pub fn verify_with_policy(
    raw: &str,
    secret: &[u8],
    now: DateTime<Utc>,
    policy: &FreshnessPolicy,
) -> Result<VerifiedUser, AppError> {
    let parsed = parser::parse(raw)?;

    let expected = compute_hash(&parsed.check_string(), secret)?;
    // Compared as the exact hex string: a case change in `hash` is a mismatch.
    let matches: bool = expected.as_bytes().ct_eq(parsed.hash.as_bytes()).into();
    if !matches {
        return Err(AppError::signature_mismatch("Init data hash does not match"));
    }

    let age = now
        .timestamp()
        .checked_sub(parsed.auth_date)
        .ok_or_else(|| AppError::malformed_payload("Init data 'auth_date' is out of range"))?;
    if age > policy.window.num_seconds() {
        return Err(AppError::replay_window_exceeded(format!(
            "Init data is {age}s old; window is {}s",
            policy.window.num_seconds()
        )));
    }
    // `num_seconds` of a chrono duration is bounded well inside `i64`.
    if age < -policy.max_future_skew.num_seconds() {
        return Err(AppError::malformed_payload(
            "Init data 'auth_date' is in the future",
        ));
    }

    let user_json = parsed
        .get(USER_FIELD)
        .ok_or_else(|| AppError::malformed_payload("Init data is missing 'user'"))?;
    let user: InitDataUser = serde_json::from_str(user_json)
        .map_err(|e| AppError::malformed_payload(format!("Init data 'user' is invalid: {e}")))?;

    let auth_date = DateTime::from_timestamp(parsed.auth_date, 0)
        .ok_or_else(|| AppError::malformed_payload("Init data 'auth_date' is out of range"))?;

    Ok(VerifiedUser {
        user,
        auth_date,
        query_id: parsed.get("query_id").map(String::from),
        start_param: parsed.get("start_param").map(String::from),
        chat_type: parsed.get("chat_type").map(String::from),
        chat_instance: parsed.get("chat_instance").map(String::from),
    })
}

/// `hex(HMAC-SHA256(HMAC-SHA256("WebAppData", secret), check_string))`.
pub(crate) fn compute_hash(check_string: &str, secret: &[u8]) -> Result<String, AppError> {
    let mut key_mac = HmacSha256::new_from_slice(INIT_DATA_KEY_SALT)
        .map_err(|e| AppError::internal(format!("HMAC key setup failed: {e}")))?;
    key_mac.update(secret);
    let secret_key = key_mac.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(&secret_key)
        .map_err(|e| AppError::internal(format!("HMAC key setup failed: {e}")))?;
    mac.update(check_string.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use tenantgate_core::ErrorKind;
    use tenantgate_core::traits::ManualClock;

    use super::*;
    use crate::init_data::sign_init_data;

    const BOT_TOKEN: &[u8] = b"123456:TEST-TOKEN";

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    fn payload(auth_date: i64, token: &[u8]) -> String {
        let auth_date = auth_date.to_string();
        sign_init_data(
            [
                ("auth_date", auth_date.as_str()),
                ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
                ("user", r#"{"id":42,"first_name":"Ada","username":"ada"}"#),
            ],
            token,
        )
        .expect("sign")
    }

    #[test]
    fn test_valid_payload_verifies() {
        let raw = payload(now().timestamp(), BOT_TOKEN);
        let verified = verify(&raw, BOT_TOKEN, now(), Duration::hours(24)).expect("verify");

        assert_eq!(verified.external_user_id(), 42);
        assert_eq!(verified.user.username.as_deref(), Some("ada"));
        assert_eq!(verified.query_id.as_deref(), Some("AAHdF6IQAAAAAN0XohDhrOrc"));
        assert_eq!(verified.auth_date, now());
    }

    #[test]
    fn test_wrong_secret_is_signature_mismatch() {
        let raw = payload(now().timestamp(), b"other:TOKEN");
        let err = verify(&raw, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SignatureMismatch);
    }

    #[test]
    fn test_uppercased_hash_is_mismatch() {
        let raw = payload(now().timestamp(), BOT_TOKEN);
        let (body, hash) = raw.rsplit_once("hash=").expect("hash present");
        let raw = format!("{body}hash={}", hash.to_uppercase());
        let err = verify(&raw, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SignatureMismatch);
    }

    #[test]
    fn test_truncated_hash_is_mismatch() {
        let raw = payload(now().timestamp(), BOT_TOKEN);
        let raw = &raw[..raw.len() - 2];
        let err = verify(raw, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SignatureMismatch);
    }

    #[test]
    fn test_replay_window_boundary() {
        let window = Duration::hours(24);

        let at_edge = payload(now().timestamp() - window.num_seconds(), BOT_TOKEN);
        assert!(verify(&at_edge, BOT_TOKEN, now(), window).is_ok());

        let past_edge = payload(now().timestamp() - window.num_seconds() - 1, BOT_TOKEN);
        let err = verify(&past_edge, BOT_TOKEN, now(), window).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReplayWindowExceeded);
    }

    #[test]
    fn test_future_payload_beyond_skew_is_rejected() {
        let slightly_ahead = payload(now().timestamp() + 5, BOT_TOKEN);
        assert!(verify(&slightly_ahead, BOT_TOKEN, now(), Duration::hours(24)).is_ok());

        let far_ahead = payload(now().timestamp() + 3600, BOT_TOKEN);
        let err = verify(&far_ahead, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedPayload);
    }

    #[test]
    fn test_extreme_auth_date_is_rejected_without_overflow() {
        let ancient = payload(i64::MIN, BOT_TOKEN);
        let err = verify(&ancient, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedPayload);

        let distant = payload(i64::MAX, BOT_TOKEN);
        let err = verify(&distant, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedPayload);

        let very_old = payload(i64::MIN / 2, BOT_TOKEN);
        let err = verify(&very_old, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReplayWindowExceeded);
    }

    #[test]
    fn test_missing_user_is_malformed() {
        let auth_date = now().timestamp().to_string();
        let raw = sign_init_data([("auth_date", auth_date.as_str())], BOT_TOKEN).expect("sign");
        let err = verify(&raw, BOT_TOKEN, now(), Duration::hours(24)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedPayload);
    }

    #[test]
    fn test_tenant_secret_never_falls_back_to_platform() {
        let mut tenants = HashMap::new();
        tenants.insert(TenantId::new("t-1"), "tenant:TOKEN".to_string());
        let secrets = InitDataSecrets::new(Some(String::from_utf8_lossy(BOT_TOKEN).into()), tenants);
        let verifier = InitDataVerifier::new(
            secrets,
            FreshnessPolicy {
                window: Duration::hours(24),
                max_future_skew: Duration::seconds(30),
            },
            Arc::new(ManualClock::new(now())),
        );

        // Platform-signed payload presented for a tenant: the tenant secret is used.
        let platform_signed = payload(now().timestamp(), BOT_TOKEN);
        let err = verifier
            .verify(&platform_signed, Some(&TenantId::new("t-1")))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SignatureMismatch);

        // Unknown tenant: no silent fallback.
        let err = verifier
            .verify(&platform_signed, Some(&TenantId::new("t-2")))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::IdentityNotAuthorized);

        let tenant_signed = payload(now().timestamp(), b"tenant:TOKEN");
        assert!(verifier.verify(&tenant_signed, Some(&TenantId::new("t-1"))).is_ok());
        assert!(verifier.verify(&platform_signed, None).is_ok());
    }

    #[test]
    fn test_secrets_debug_hides_tokens() {
        let secrets = InitDataSecrets::new(Some("secret-token".to_string()), HashMap::new());
        assert!(!format!("{secrets:?}").contains("secret-token"));
    }
}
