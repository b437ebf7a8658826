//! Init-data CLI commands.

use std::sync::Arc;

use clap::Args;

use tenantgate_auth::InitDataVerifier;
use tenantgate_auth::init_data::{InitDataSecrets, sign_init_data};
use tenantgate_core::config::AppConfig;
use tenantgate_core::error::AppError;
use tenantgate_core::traits::{ClockSource, SystemClock};
use tenantgate_core::types::TenantId;

use crate::output::{self, OutputFormat};

/// Arguments for producing a signed payload
#[derive(Debug, Args)]
pub struct SignArgs {
    /// External (chat host) user id
    #[arg(long)]
    pub user_id: i64,
    /// First name embedded in the user object
    #[arg(long, default_value = "Dev")]
    pub first_name: String,
    /// Username embedded in the user object
    #[arg(long)]
    pub username: Option<String>,
    /// Unix seconds; defaults to now
    #[arg(long)]
    pub auth_date: Option<i64>,
    /// Sign with this tenant's bot token instead of the platform's
    #[arg(long)]
    pub tenant: Option<String>,
}

/// Arguments for verifying a payload
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Raw URL-encoded payload
    pub payload: String,
    /// Verify against this tenant's bot token
    #[arg(long)]
    pub tenant: Option<String>,
}

/// Sign a payload with the configured bot token
pub fn sign(args: &SignArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let payload = signed_payload(args, config, &SystemClock)?;

    match format {
        OutputFormat::Table => println!("{}", payload),
        OutputFormat::Json => output::print_record(
            &serde_json::json!({ "payload": payload }),
            &[],
            format,
        ),
    }
    Ok(())
}

/// Verify a payload against the configured bot tokens and the system clock
pub fn verify(args: &VerifyArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let tenant = args.tenant.as_deref().map(TenantId::from);
    let verifier = InitDataVerifier::from_config(&config.init_data, Arc::new(SystemClock));
    let verified = verifier.verify(&args.payload, tenant.as_ref())?;

    output::print_success("Init data verified");
    let rows = [
        ("User id", verified.user.id.to_string()),
        ("First name", verified.user.first_name.clone()),
        (
            "Username",
            verified.user.username.clone().unwrap_or_default(),
        ),
        ("Auth date", verified.auth_date.to_string()),
    ];
    output::print_record(&verified, &rows, format);
    Ok(())
}

/// Build the signed payload, stamping `auth_date` from `clock` unless given
fn signed_payload(
    args: &SignArgs,
    config: &AppConfig,
    clock: &dyn ClockSource,
) -> Result<String, AppError> {
    let tenant = args.tenant.as_deref().map(TenantId::from);
    let secrets = InitDataSecrets::from_config(&config.init_data);
    let secret = secrets.resolve(tenant.as_ref())?;

    let mut user = serde_json::json!({ "id": args.user_id, "first_name": args.first_name });
    if let Some(username) = &args.username {
        user["username"] = serde_json::Value::String(username.clone());
    }
    let user = user.to_string();
    let auth_date = args
        .auth_date
        .unwrap_or_else(|| clock.now().timestamp())
        .to_string();

    sign_init_data(
        [("auth_date", auth_date.as_str()), ("user", user.as_str())],
        secret,
    )
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use tenantgate_core::traits::ManualClock;

    use super::*;

    fn sign_args(auth_date: Option<i64>) -> SignArgs {
        SignArgs {
            user_id: 42,
            first_name: "Dev".to_string(),
            username: None,
            auth_date,
            tenant: None,
        }
    }

    #[test]
    fn test_default_auth_date_comes_from_the_clock() {
        let mut config = AppConfig::default();
        config.init_data.platform_bot_token = Some("123:ABC".to_string());
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_000_000_000, 0).expect("valid timestamp"),
        ));

        let payload = signed_payload(&sign_args(None), &config, clock.as_ref()).expect("sign");
        assert!(payload.contains("date=1000000000&"));

        let verifier = InitDataVerifier::from_config(&config.init_data, clock);
        let verified = verifier.verify(&payload, None).expect("verify");
        assert_eq!(verified.external_user_id(), 42);
    }

    #[test]
    fn test_explicit_auth_date_is_kept() {
        let mut config = AppConfig::default();
        config.init_data.platform_bot_token = Some("123:ABC".to_string());

        let payload =
            signed_payload(&sign_args(Some(1_234)), &config, &SystemClock).expect("sign");
        assert!(payload.contains("date=1234&"));
    }
}
