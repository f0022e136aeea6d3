//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use clubfeed_core::error::AppError;
use clubfeed_core::types::kind::SourceKind;

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
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path, env)?;
            match format {
                OutputFormat::Json => output::print_item(&config),
                OutputFormat::Table => {
                    output::print_kv("Store", &config.store.provider);
                    output::print_kv("Store path", &config.store.path);
                    output::print_kv("Feed cap", &config.feed.max_items.to_string());
                    output::print_kv(
                        "Start window",
                        &format!("{} min", config.feed.start_window_minutes),
                    );
                    output::print_kv("Refresh schedule", &config.refresh.schedule);
                    output::print_kv(
                        "User",
                        config.session.user_id.as_deref().unwrap_or("(none)"),
                    );
                    for kind in SourceKind::ALL {
                        let settings = config.feed.sources.for_kind(kind);
                        output::print_kv(
                            &format!("Source {kind}"),
                            &format!(
                                "enabled={} exclude_own={}",
                                settings.enabled, settings.exclude_own
                            ),
                        );
                    }
                }
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path, env) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Store", &config.store.provider);
                output::print_kv(
                    "Record fixture",
                    config.records.fixture_path.as_deref().unwrap_or("(none)"),
                );
                if config.session.to_context().is_none() {
                    output::print_warning("No session.user_id configured");
                }
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
