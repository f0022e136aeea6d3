//! Wiring shared by the daemon and the CLI.

use std::sync::Arc;

use tracing::info;

use clubfeed_core::config::AppConfig;
use clubfeed_core::result::AppResult;
use clubfeed_core::traits::session::SessionProvider;
use clubfeed_store::{FixtureRecordStore, StateKeys, StoreManager};

use crate::feed::aggregator::FeedAggregator;

/// Everything a front end needs to drive the aggregator.
#[derive(Debug)]
pub struct AppContext {
    /// Loaded configuration.
    pub config: AppConfig,
    /// The configured key-value backend.
    pub store: Arc<StoreManager>,
    /// Records the readers query.
    pub records: Arc<FixtureRecordStore>,
    /// The aggregator.
    pub aggregator: Arc<FeedAggregator>,
}

impl AppContext {
    /// Open the store, load the record fixture and build the aggregator.
    pub async fn build(config: AppConfig, session: Arc<dyn SessionProvider>) -> AppResult<Self> {
        let store = Arc::new(StoreManager::new(&config.store).await?);

        let records = match config.records.fixture_path.as_deref() {
            Some(path) => Arc::new(FixtureRecordStore::from_file(path).await?),
            None => {
                info!("No record fixture configured, starting with an empty record set");
                Arc::new(FixtureRecordStore::default())
            }
        };

        let aggregator = Arc::new(FeedAggregator::new(
            config.feed.clone(),
            StateKeys::from_config(&config.store),
            Arc::clone(&store) as _,
            Arc::clone(&records) as _,
            session,
        ));

        Ok(Self {
            config,
            store,
            records,
            aggregator,
        })
    }
}
