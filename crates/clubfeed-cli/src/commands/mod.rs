//! CLI command definitions and dispatch.

pub mod config;
pub mod feed;
pub mod refresh;
pub mod reset;
pub mod state;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use clubfeed_core::config::AppConfig;
use clubfeed_core::error::AppError;
use clubfeed_core::traits::session::StaticSession;
use clubfeed_service::AppContext;

/// ClubFeed: news feed aggregation for club members
#[derive(Debug, Parser)]
#[command(name = "clubfeed", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/<env>.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Act as this user instead of `session.user_id`
    #[arg(short, long)]
    pub user: Option<String>,

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
    /// Run one aggregation pass
    Refresh,
    /// Show the persisted feed
    Feed(feed::FeedArgs),
    /// Show the persisted watermark
    State,
    /// Delete the user's feed and watermark
    Reset(reset::ResetArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, &self.config, &self.env, self.format),
            Commands::Refresh => refresh::execute(&self.context().await?, self.format).await,
            Commands::Feed(args) => feed::execute(args, &self.context().await?, self.format).await,
            Commands::State => state::execute(&self.context().await?, self.format).await,
            Commands::Reset(args) => reset::execute(args, &self.context().await?).await,
        }
    }

    /// Load configuration and wire the aggregator for the selected user.
    async fn context(&self) -> Result<AppContext, AppError> {
        let mut config = load_config(&self.config, &self.env)?;
        if let Some(user) = &self.user {
            config.session.user_id = Some(user.clone());
        }

        let session = config.session.to_context().ok_or_else(|| {
            AppError::session("No user configured; set session.user_id or pass --user")
        })?;

        AppContext::build(config, Arc::new(StaticSession(session))).await
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str, env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path, env)
}
