//! Loading and persisting a user's feed and watermark.
//!
//! Both entries are read at the start of a pass and written together at
//! its end with one `set_many`. Unreadable JSON is treated as absent so a
//! corrupted entry heals on the next successful pass. Store errors are
//! never swallowed.

use serde::de::DeserializeOwned;
use tracing::warn;

use clubfeed_core::result::AppResult;
use clubfeed_core::traits::kv_store::KeyValueStore;
use clubfeed_core::types::id::UserId;
use clubfeed_entity::notification::NotificationItem;
use clubfeed_entity::watermark::WatermarkStore;
use clubfeed_store::StateKeys;

/// Persisted state of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    /// Feed, newest first.
    pub feed: Vec<NotificationItem>,
    /// What has been observed so far.
    pub watermark: WatermarkStore,
}

/// Read both entries for `user_id`.
pub async fn load_state(
    store: &dyn KeyValueStore,
    keys: &StateKeys,
    user_id: &UserId,
) -> AppResult<FeedState> {
    let feed = load_feed(store, keys, user_id).await?;
    let watermark = load_watermark(store, keys, user_id).await?;
    Ok(FeedState { feed, watermark })
}

/// Read only the feed.
pub async fn load_feed(
    store: &dyn KeyValueStore,
    keys: &StateKeys,
    user_id: &UserId,
) -> AppResult<Vec<NotificationItem>> {
    let key = keys.feed(user_id);
    let raw = store.get(&key).await?;
    Ok(parse_or_default(&key, raw))
}

/// Read only the watermark.
pub async fn load_watermark(
    store: &dyn KeyValueStore,
    keys: &StateKeys,
    user_id: &UserId,
) -> AppResult<WatermarkStore> {
    let key = keys.meta(user_id);
    let raw = store.get(&key).await?;
    Ok(parse_or_default(&key, raw))
}

/// Write feed and watermark as one unit.
pub async fn save_state(
    store: &dyn KeyValueStore,
    keys: &StateKeys,
    user_id: &UserId,
    state: &FeedState,
) -> AppResult<()> {
    let entries = [
        (keys.feed(user_id), serde_json::to_string(&state.feed)?),
        (keys.meta(user_id), serde_json::to_string(&state.watermark)?),
    ];
    store.set_many(&entries).await
}

/// Remove both entries.
pub async fn clear_state(
    store: &dyn KeyValueStore,
    keys: &StateKeys,
    user_id: &UserId,
) -> AppResult<()> {
    store.delete(&keys.feed(user_id)).await?;
    store.delete(&keys.meta(user_id)).await
}

fn parse_or_default<T>(key: &str, raw: Option<String>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Persisted state is malformed, starting from empty");
            T::default()
        }
    }
}
