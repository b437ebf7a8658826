//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tenantgate_auth::init_data::sign_init_data;
use tenantgate_auth::{
    Identity, InitDataVerifier, MemoryStampStore, SessionLifecycleManager, SessionTokenService,
};
use tenantgate_core::config::AppConfig;
use tenantgate_core::error::AppError;
use tenantgate_core::traits::{ClockSource, ManualClock, SecurityStampStore};
use tenantgate_core::types::{IdentityId, Stamp, TenantId};

/// Platform bot token used to sign payloads in tests.
pub const BOT_TOKEN: &str = "424242:TEST-BOT-TOKEN";

/// Fixed starting instant for every test clock.
pub const START: i64 = 1_700_000_000;

/// Test auth context wired around a manual clock.
pub struct TestAuth {
    /// Manually advanced clock shared by every component.
    pub clock: Arc<ManualClock>,
    /// Stamp store handed to the manager.
    pub stamps: Arc<dyn SecurityStampStore>,
    /// Token service handed to the manager.
    pub tokens: Arc<SessionTokenService>,
    /// Lifecycle manager under test.
    pub manager: SessionLifecycleManager,
    /// Init-data verifier under test.
    pub verifier: InitDataVerifier,
    /// Configuration used to build everything.
    pub config: AppConfig,
}

impl TestAuth {
    /// Create a test context with an in-memory stamp store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStampStore::new()))
    }

    /// Create a test context around a specific stamp store.
    pub fn with_store(stamps: Arc<dyn SecurityStampStore>) -> Self {
        let config = test_config();
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(START, 0).expect("valid timestamp"),
        ));
        let dyn_clock: Arc<dyn ClockSource> = clock.clone();

        let tokens = Arc::new(SessionTokenService::new(&config.session, dyn_clock.clone()));
        let manager = SessionLifecycleManager::new(
            tokens.clone(),
            stamps.clone(),
            Arc::new(tenantgate_auth::RoleResolver::new(&config.session)),
            config.transport.clone(),
            tenantgate_auth::session::StampReadPolicy::from_config(&config.stamp_store),
        );
        let verifier = InitDataVerifier::from_config(&config.init_data, dyn_clock);

        Self {
            clock,
            stamps,
            tokens,
            manager,
            verifier,
            config,
        }
    }

    /// Current test time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A payload for `user_id` signed with the platform token.
    pub fn signed_payload(&self, user_id: i64, auth_date: i64) -> String {
        let user = serde_json::json!({ "id": user_id, "first_name": "Test" }).to_string();
        let auth_date = auth_date.to_string();
        sign_init_data(
            [("auth_date", auth_date.as_str()), ("user", user.as_str())],
            BOT_TOKEN.as_bytes(),
        )
        .expect("sign init data")
    }
}

/// Configuration with real-looking secrets and a 1ms retry backoff.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.session.token_secret = "integration-test-secret".to_string();
    config.init_data.platform_bot_token = Some(BOT_TOKEN.to_string());
    config
        .init_data
        .tenant_bot_tokens
        .insert("t-1".to_string(), "1111:TENANT-ONE".to_string());
    config.stamp_store.read_retries = 3;
    config.stamp_store.retry_backoff_ms = 1;
    config
}

/// An identity as the external repository would return it.
pub fn identity(role: &str, tenant: Option<&str>) -> Identity {
    Identity::new(IdentityId::new(), 42, role, tenant.map(TenantId::from))
}

/// Stamp store whose reads fail a configurable number of times.
#[derive(Debug)]
pub struct FlakyStampStore {
    /// Backing store once reads succeed.
    pub inner: MemoryStampStore,
    /// Remaining failing reads.
    pub failures_left: AtomicU32,
    /// Total read calls observed.
    pub reads: AtomicU32,
    /// Whether failures are transient (`StoreUnavailable`) or not.
    pub transient: bool,
}

impl FlakyStampStore {
    /// Fails the next `failures` reads.
    pub fn new(failures: u32, transient: bool) -> Self {
        Self {
            inner: MemoryStampStore::new(),
            failures_left: AtomicU32::new(failures),
            reads: AtomicU32::new(0),
            transient,
        }
    }

    /// Arms `failures` more failing reads.
    pub fn fail_next(&self, failures: u32) {
        self.failures_left.store(failures, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecurityStampStore for FlakyStampStore {
    async fn read(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(if self.transient {
                AppError::store_unavailable("connection reset")
            } else {
                AppError::internal("corrupt stamp row")
            });
        }
        self.inner.read(identity_id).await
    }

    async fn rotate(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        self.inner.rotate(identity_id).await
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(self.failures_left.load(Ordering::SeqCst) == 0)
    }
}
