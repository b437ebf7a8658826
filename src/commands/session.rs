//! Session credential CLI commands.
//!
//! With the in-memory stamp store every invocation starts from empty state,
//! so credentials only survive across invocations with the Redis backend.

use std::sync::Arc;

use clap::Args;

use tenantgate_auth::{
    AuthenticatedContext, Identity, IssuedCredential, SessionLifecycleManager, StampStoreDispatch,
};
use tenantgate_core::config::{AppConfig, StampStoreProvider};
use tenantgate_core::error::AppError;
use tenantgate_core::traits::SystemClock;
use tenantgate_core::types::{IdentityId, TenantId};

use crate::output::{self, OutputFormat};

/// Arguments for issuing a credential
#[derive(Debug, Args)]
pub struct IssueArgs {
    /// Internal identity id; a new one is generated when omitted
    #[arg(long = "identity")]
    pub identity_id: Option<String>,
    /// External (chat host) user id
    #[arg(long)]
    pub external_user_id: i64,
    /// Role as stored for the identity
    #[arg(long, default_value = "member")]
    pub role: String,
    /// Tenant the identity acts for
    #[arg(long)]
    pub tenant: Option<String>,
}

/// Arguments for commands taking a credential
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Session token
    pub token: String,
}

/// Arguments for revocation
#[derive(Debug, Args)]
pub struct RevokeArgs {
    /// Identity whose credentials are revoked
    #[arg(long = "identity")]
    pub identity_id: String,
}

/// Issue a credential
pub async fn issue(
    args: &IssueArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let manager = build_manager(config).await?;
    let identity_id = match &args.identity_id {
        Some(id) => parse_identity_id(id)?,
        None => IdentityId::new(),
    };
    let identity = Identity::new(
        identity_id,
        args.external_user_id,
        &args.role,
        args.tenant.as_deref().map(TenantId::from),
    );

    let credential = manager.issue(&identity).await?;
    print_credential(&credential, format);
    Ok(())
}

/// Verify a credential
pub async fn verify(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let manager = build_manager(config).await?;
    let context = manager.verify(&args.token).await?;
    print_context(&context, format);
    Ok(())
}

/// Renew a credential
pub async fn heartbeat(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let manager = build_manager(config).await?;
    let credential = manager.heartbeat(&args.token).await?;
    print_credential(&credential, format);
    Ok(())
}

/// Revoke every credential of an identity
pub async fn revoke(args: &RevokeArgs, config: &AppConfig) -> Result<(), AppError> {
    let manager = build_manager(config).await?;
    let identity_id = parse_identity_id(&args.identity_id)?;
    manager.revoke_all(&identity_id).await?;
    output::print_success(&format!("All credentials of {} revoked", identity_id));
    Ok(())
}

/// Wire a manager from configuration against the system clock
async fn build_manager(config: &AppConfig) -> Result<SessionLifecycleManager, AppError> {
    config.validate()?;
    if config.stamp_store.provider == StampStoreProvider::Memory {
        output::print_warning("In-memory stamp store: state is discarded when this command exits");
    }
    let stamps = StampStoreDispatch::from_config(&config.stamp_store).await?;
    Ok(SessionLifecycleManager::from_config(
        config,
        Arc::new(stamps),
        Arc::new(SystemClock),
    ))
}

fn parse_identity_id(raw: &str) -> Result<IdentityId, AppError> {
    raw.parse()
        .map_err(|e| AppError::identity_not_authorized(format!("Invalid identity id '{raw}': {e}")))
}

fn print_credential(credential: &IssuedCredential, format: OutputFormat) {
    let rows = [
        ("Token", credential.token.clone()),
        ("Identity", credential.claims.sub.to_string()),
        ("Role", credential.claims.role.clone()),
        ("Tier", credential.tier.to_string()),
        (
            "Tenant",
            credential
                .claims
                .tid
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        ("Expires", credential.claims.expires_at().to_rfc3339()),
        ("Cookie", credential.transport.cookie_name.clone()),
        ("SameSite", credential.transport.same_site.to_string()),
        ("Secure", credential.transport.secure.to_string()),
    ];
    output::print_record(credential, &rows, format);
}

fn print_context(context: &AuthenticatedContext, format: OutputFormat) {
    let rows = [
        ("Identity", context.claims.sub.to_string()),
        ("Role", context.claims.role.clone()),
        ("Tier", context.tier.to_string()),
        (
            "Tenant",
            context
                .tenant_id()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        ("Expires", context.claims.expires_at().to_rfc3339()),
    ];
    output::print_record(context, &rows, format);
}
