//! Show the persisted feed.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use clubfeed_core::error::AppError;
use clubfeed_entity::notification::NotificationItem;
use clubfeed_service::AppContext;

/// Arguments for the feed command
#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Show at most this many entries
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

/// Feed display row
#[derive(Debug, Serialize, Tabled)]
struct FeedRow {
    /// When
    created: String,
    /// Category
    category: String,
    /// Organization
    org: String,
    /// What happened
    text: String,
}

impl From<&NotificationItem> for FeedRow {
    fn from(item: &NotificationItem) -> Self {
        Self {
            created: item.created_at.format("%Y-%m-%d %H:%M").to_string(),
            category: item.category_label.clone(),
            org: item.org_name.clone().unwrap_or_else(|| "Persoenlich".to_string()),
            text: item.change_text.clone(),
        }
    }
}

/// Execute the feed command
pub async fn execute(args: &FeedArgs, ctx: &AppContext, format: OutputFormat) -> Result<(), AppError> {
    ctx.aggregator.load().await?;
    let feed = ctx.aggregator.snapshot();
    let shown = &feed[..feed.len().min(args.limit)];

    match format {
        OutputFormat::Json => output::print_item(&shown),
        OutputFormat::Table => {
            let rows: Vec<FeedRow> = shown.iter().map(FeedRow::from).collect();
            output::print_list(&rows, format);
            if feed.len() > shown.len() {
                println!("… {} more", feed.len() - shown.len());
            }
        }
    }
    Ok(())
}
