//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use tenantgate_core::config::AppConfig;
use tenantgate_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Validate the loaded configuration
    Check,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Check => {
            if let Err(e) = config.validate() {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }

            output::print_success(&format!("Configuration '{}' is valid", config_path));
            let rows = [
                (
                    "Platform bot token",
                    mask(config.init_data.platform_bot_token.as_deref()),
                ),
                (
                    "Tenant bot tokens",
                    config.init_data.tenant_bot_tokens.len().to_string(),
                ),
                (
                    "Replay window",
                    format!("{}s", config.init_data.replay_window_seconds),
                ),
                ("Token secret", mask(Some(&config.session.token_secret))),
                (
                    "Stamp store",
                    format!("{:?}", config.stamp_store.provider).to_lowercase(),
                ),
                ("Cookie", config.transport.cookie_name.clone()),
                ("Cross-site", config.transport.cross_site.to_string()),
            ];
            output::print_record(&Summary::from(config), &rows, format);
        }
    }

    Ok(())
}

/// Redacted view of the configuration for JSON output
#[derive(Debug, serde::Serialize)]
struct Summary {
    platform_bot_token: bool,
    tenants: Vec<String>,
    replay_window_seconds: u64,
    stamp_store: String,
    cookie_name: String,
    cross_site: bool,
}

impl From<&AppConfig> for Summary {
    fn from(config: &AppConfig) -> Self {
        let mut tenants: Vec<String> = config.init_data.tenant_bot_tokens.keys().cloned().collect();
        tenants.sort();
        Self {
            platform_bot_token: config.init_data.platform_bot_token.is_some(),
            tenants,
            replay_window_seconds: config.init_data.replay_window_seconds,
            stamp_store: format!("{:?}", config.stamp_store.provider).to_lowercase(),
            cookie_name: config.transport.cookie_name.clone(),
            cross_site: config.transport.cross_site,
        }
    }
}

/// Show only the first characters of a secret
fn mask(secret: Option<&str>) -> String {
    match secret {
        Some(s) if s.chars().count() > 4 => {
            format!("{}****", s.chars().take(4).collect::<String>())
        }
        Some(_) => "****".to_string(),
        None => "(not set)".to_string(),
    }
}
