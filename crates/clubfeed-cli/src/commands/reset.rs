//! Delete a user's persisted feed state.

use clap::Args;

use crate::output;
use clubfeed_core::error::AppError;
use clubfeed_service::AppContext;

/// Arguments for the reset command
#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the reset command
pub async fn execute(args: &ResetArgs, ctx: &AppContext) -> Result<(), AppError> {
    if !args.yes {
        let user = ctx.config.session.user_id.as_deref().unwrap_or_default();
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete the feed of '{user}'? Every visible record will be reported as new again."
            ))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let user_id = ctx.aggregator.reset().await?;
    output::print_success(&format!("Feed state of '{user_id}' deleted"));
    Ok(())
}
