//! Show the persisted watermark.

use crate::output::{self, OutputFormat};
use clubfeed_core::error::AppError;
use clubfeed_service::AppContext;

/// Execute the state command
pub async fn execute(ctx: &AppContext, format: OutputFormat) -> Result<(), AppError> {
    let (user_id, watermark) = ctx.aggregator.watermark().await?;

    match format {
        OutputFormat::Json => output::print_item(&watermark),
        OutputFormat::Table => {
            output::print_kv("User", user_id.as_str());
            output::print_kv("Known records", &watermark.signatures.len().to_string());
            output::print_kv("Notified starts", &watermark.seen_starts.len().to_string());
            output::print_kv(
                "Last start check",
                &watermark
                    .last_start_check
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string()),
            );
        }
    }
    Ok(())
}
