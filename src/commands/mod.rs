//! CLI command definitions and dispatch.

pub mod config;
pub mod init_data;
pub mod session;

use clap::{Parser, Subcommand};

use tenantgate_core::config::AppConfig;
use tenantgate_core::error::AppError;

use crate::output::OutputFormat;

/// TenantGate: init-data verification and session credentials
#[derive(Debug, Parser)]
#[command(name = "tenantgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Produce a signed init-data payload for local development
    SignInitData(init_data::SignArgs),
    /// Verify an init-data payload
    VerifyInitData(init_data::VerifyArgs),
    /// Issue a session credential
    Issue(session::IssueArgs),
    /// Verify a session credential
    Verify(session::TokenArgs),
    /// Renew a session credential
    Heartbeat(session::TokenArgs),
    /// Revoke every credential of an identity
    Revoke(session::RevokeArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::SignInitData(args) => init_data::sign(args, &config, self.format),
            Commands::VerifyInitData(args) => init_data::verify(args, &config, self.format),
            Commands::Issue(args) => session::issue(args, &config, self.format).await,
            Commands::Verify(args) => session::verify(args, &config, self.format).await,
            Commands::Heartbeat(args) => session::heartbeat(args, &config, self.format).await,
            Commands::Revoke(args) => session::revoke(args, &config).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file and environment
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}
