//! Run one aggregation pass.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use clubfeed_core::error::AppError;
use clubfeed_service::{AppContext, PassSummary, RefreshOutcome};

/// Per-kind display row
#[derive(Debug, Serialize, Tabled)]
struct SourceRow {
    /// Kind
    kind: String,
    /// Visible records, or "unavailable"
    records: String,
}

/// Execute the refresh command
pub async fn execute(ctx: &AppContext, format: OutputFormat) -> Result<(), AppError> {
    match ctx.aggregator.refresh().await {
        RefreshOutcome::Completed(summary) => {
            print_summary(&summary, format);
            Ok(())
        }
        RefreshOutcome::Failed(e) => Err(e),
        RefreshOutcome::SignedOut => Err(AppError::session("No user is signed in")),
        RefreshOutcome::Busy => {
            output::print_warning("A refresh is already running");
            Ok(())
        }
    }
}

fn print_summary(summary: &PassSummary, format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_item(summary);
        return;
    }

    let mut rows: Vec<SourceRow> = summary
        .records_read
        .iter()
        .map(|(kind, count)| SourceRow {
            kind: kind.to_string(),
            records: count.to_string(),
        })
        .collect();
    rows.extend(summary.failed_sources.iter().map(|kind| SourceRow {
        kind: kind.to_string(),
        records: "unavailable".to_string(),
    }));
    output::print_list(&rows, format);

    output::print_success(&format!(
        "Pass complete: {} new, {} updated, {} started",
        summary.new_items, summary.updated_items, summary.started_items
    ));
    output::print_kv("Feed entries", &summary.feed_len.to_string());
    if summary.pruned_starts > 0 {
        output::print_kv("Expired starts", &summary.pruned_starts.to_string());
    }
    if summary.pruned_signatures > 0 {
        output::print_kv("Removed records", &summary.pruned_signatures.to_string());
    }
}
