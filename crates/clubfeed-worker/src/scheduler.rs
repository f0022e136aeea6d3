//! Cron scheduler for periodic feed refreshes.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use clubfeed_core::config::refresh::RefreshConfig;
use clubfeed_core::error::AppError;
use clubfeed_service::{FeedAggregator, RefreshOutcome};

/// Cron-based trigger for aggregation passes.
pub struct RefreshScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Aggregator refreshed on every tick
    aggregator: Arc<FeedAggregator>,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler").finish()
    }
}

impl RefreshScheduler {
    /// Create a new scheduler for `aggregator`.
    pub async fn new(aggregator: Arc<FeedAggregator>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            aggregator,
        })
    }

    /// Register the periodic refresh job.
    ///
    /// Does nothing when the trigger is disabled. An unparsable cron
    /// expression is a configuration error.
    pub async fn register(&self, config: &RefreshConfig) -> Result<(), AppError> {
        if !config.enabled {
            tracing::info!("Periodic refresh disabled");
            return Ok(());
        }

        let aggregator = Arc::clone(&self.aggregator);
        let job = CronJob::new_async(config.schedule.as_str(), move |_uuid, _lock| {
            let aggregator = Arc::clone(&aggregator);
            Box::pin(async move {
                tracing::debug!("Scheduled feed refresh");
                match aggregator.refresh().await {
                    RefreshOutcome::Busy => {
                        tracing::debug!("Previous refresh still running, tick skipped");
                    }
                    RefreshOutcome::Failed(e) => {
                        tracing::error!("Scheduled feed refresh failed: {}", e);
                    }
                    RefreshOutcome::SignedOut | RefreshOutcome::Completed(_) => {}
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid refresh schedule '{}': {e}",
                config.schedule
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add refresh schedule: {e}")))?;

        tracing::info!(schedule = %config.schedule, "Registered: feed_refresh");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Refresh scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Refresh scheduler shut down");
        Ok(())
    }
}
