//! Session lifecycle manager: issue, verify, heartbeat, revoke.
//!
//! Credentials are stateless: nothing is stored per session. Each identity has
//! one security stamp; every token embeds the stamp it was signed against, and
//! rotating the stamp invalidates all of them at their next verification.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use subtle::ConstantTimeEq;
use tracing::{error, info, warn};

use tenantgate_core::config::{AppConfig, StampStoreConfig, TransportConfig};
use tenantgate_core::error::AppError;
use tenantgate_core::traits::{ClockSource, SecurityStampStore};
use tenantgate_core::types::{IdentityId, Stamp};

use crate::role::RoleResolver;
use crate::token::{SessionClaims, SessionTokenService};

use super::context::{AuthenticatedContext, IssuedCredential};
use super::identity::Identity;
use super::transport::TransportAttributes;

/// Bounded retry policy for transient stamp store read failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampReadPolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Backoff before the first retry; doubled for each further retry.
    pub base_backoff: StdDuration,
}

impl StampReadPolicy {
    /// Builds the policy from stamp store configuration.
    pub fn from_config(config: &StampStoreConfig) -> Self {
        Self {
            retries: config.read_retries,
            base_backoff: StdDuration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl Default for StampReadPolicy {
    fn default() -> Self {
        Self::from_config(&StampStoreConfig::default())
    }
}

/// Orchestrates the credential lifecycle.
#[derive(Clone)]
pub struct SessionLifecycleManager {
    /// Token signing and verification.
    tokens: Arc<SessionTokenService>,
    /// Per-identity revocation stamps.
    stamps: Arc<dyn SecurityStampStore>,
    /// Role to tier/lifetime policy.
    roles: Arc<RoleResolver>,
    /// Delivery attributes for issued credentials.
    transport: TransportConfig,
    /// Retry policy for stamp reads.
    read_policy: StampReadPolicy,
}

impl std::fmt::Debug for SessionLifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycleManager")
            .field("stamps", &self.stamps)
            .field("roles", &self.roles)
            .field("transport", &self.transport)
            .field("read_policy", &self.read_policy)
            .finish()
    }
}

impl SessionLifecycleManager {
    /// Creates a new lifecycle manager with all required dependencies.
    pub fn new(
        tokens: Arc<SessionTokenService>,
        stamps: Arc<dyn SecurityStampStore>,
        roles: Arc<RoleResolver>,
        transport: TransportConfig,
        read_policy: StampReadPolicy,
    ) -> Self {
        Self {
            tokens,
            stamps,
            roles,
            transport,
            read_policy,
        }
    }

    /// Wires a manager from application configuration.
    pub fn from_config(
        config: &AppConfig,
        stamps: Arc<dyn SecurityStampStore>,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        Self::new(
            Arc::new(SessionTokenService::new(&config.session, clock)),
            stamps,
            Arc::new(RoleResolver::new(&config.session)),
            config.transport.clone(),
            StampReadPolicy::from_config(&config.stamp_store),
        )
    }

    /// Issues a credential for an identity.
    ///
    /// 1. Resolve tier and lifetime from the role
    /// 2. Enforce tenant scope for tenant owners
    /// 3. Read the current stamp
    /// 4. Build and sign claims
    pub async fn issue(&self, identity: &Identity) -> Result<IssuedCredential, AppError> {
        let grant = self.roles.resolve(&identity.role);

        if grant.tier.requires_tenant() && identity.tenant_id.is_none() {
            warn!(
                identity_id = %identity.identity_id,
                tier = %grant.tier,
                "Refusing to issue tenant-owner credential without a tenant"
            );
            return Err(AppError::identity_not_authorized(
                "Tenant owner identity has no tenant",
            ));
        }

        let stamp = self.read_stamp(&identity.identity_id).await?;
        let claims = SessionClaims::new(
            identity.identity_id,
            grant.role,
            identity.tenant_id.clone(),
            stamp,
            self.tokens.clock().now(),
            grant.ttl,
        );

        let credential = self.seal(claims)?;

        info!(
            identity_id = %identity.identity_id,
            tier = %credential.tier,
            tenant_id = ?credential.claims.tid.as_ref().map(|t| t.as_str()),
            expires_at = %credential.claims.expires_at(),
            "Session credential issued"
        );

        Ok(credential)
    }

    /// Verifies a credential presented on a protected request.
    ///
    /// Signature and expiry failures come from the token service; a stamp that
    /// no longer matches the identity's current stamp yields `Revoked`.
    pub async fn verify(&self, token: &str) -> Result<AuthenticatedContext, AppError> {
        let claims = self.tokens.verify(token)?;
        let current = self.read_stamp(&claims.sub).await?;

        if !stamps_match(&claims.stamp, &current) {
            warn!(identity_id = %claims.sub, "Credential presented with a rotated stamp");
            return Err(AppError::revoked("Credential has been revoked"));
        }

        let tier = self.roles.resolve(&claims.role).tier;
        Ok(AuthenticatedContext { claims, tier })
    }

    /// Renews a still-valid credential with a freshly computed expiry.
    ///
    /// Subject, role, tenant, and stamp carry over unchanged. A credential that
    /// is expired or revoked is never extended. The renewed expiry is always
    /// strictly later than the presented one, even within the same second.
    pub async fn heartbeat(&self, token: &str) -> Result<IssuedCredential, AppError> {
        let context = self.verify(token).await?;
        let previous = context.claims;
        let previous_exp = previous.exp;
        let grant = self.roles.resolve(&previous.role);

        let mut claims = SessionClaims::new(
            previous.sub,
            previous.role,
            previous.tid,
            previous.stamp,
            self.tokens.clock().now(),
            grant.ttl,
        );
        if claims.exp <= previous_exp {
            claims.exp = previous_exp.saturating_add(1);
        }

        let credential = self.seal(claims)?;

        info!(
            identity_id = %credential.claims.sub,
            expires_at = %credential.claims.expires_at(),
            "Session credential renewed"
        );

        Ok(credential)
    }

    /// Invalidates every credential ever issued to an identity by rotating its
    /// stamp. Safe to call repeatedly.
    pub async fn revoke_all(&self, identity_id: &IdentityId) -> Result<(), AppError> {
        self.stamps.rotate(identity_id).await.map_err(|e| {
            error!(identity_id = %identity_id, error = %e, "Failed to rotate security stamp");
            e
        })?;

        info!(identity_id = %identity_id, "All credentials revoked");
        Ok(())
    }

    /// Signs claims and attaches tier and transport attributes.
    fn seal(&self, claims: SessionClaims) -> Result<IssuedCredential, AppError> {
        let tier = self.roles.resolve(&claims.role).tier;
        let token = self.tokens.sign(&claims)?;
        let transport = TransportAttributes::for_credential(
            &self.transport,
            claims.issued_at(),
            claims.expires_at() - claims.issued_at(),
        );

        Ok(IssuedCredential {
            token,
            claims,
            tier,
            transport,
        })
    }

    /// Reads the current stamp, retrying transient failures with exponential
    /// backoff. Exhaustion fails closed.
    async fn read_stamp(&self, identity_id: &IdentityId) -> Result<Stamp, AppError> {
        let mut attempt = 0u32;
        loop {
            match self.stamps.read(identity_id).await {
                Ok(stamp) => return Ok(stamp),
                Err(e) if e.is_retryable() && attempt < self.read_policy.retries => {
                    let backoff = self.read_policy.base_backoff * 2u32.saturating_pow(attempt);
                    warn!(
                        identity_id = %identity_id,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Stamp store read failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    error!(
                        identity_id = %identity_id,
                        attempts = attempt + 1,
                        error = %e,
                        "Stamp store unavailable, failing closed"
                    );
                    return Err(AppError::store_unavailable(format!(
                        "Security stamp unavailable after {} attempts",
                        attempt + 1
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn stamps_match(presented: &Stamp, current: &Stamp) -> bool {
    presented
        .as_str()
        .as_bytes()
        .ct_eq(current.as_str().as_bytes())
        .into()
}
