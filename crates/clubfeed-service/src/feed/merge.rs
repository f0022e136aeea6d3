//! Folding a pass's entries into the persisted feed.

use std::collections::HashSet;

use clubfeed_entity::notification::NotificationItem;

/// Merge `fresh` entries in front of `previous`, drop repeated ids (the
/// first occurrence wins), order newest first and keep at most `cap`.
///
/// The sort is stable, so entries sharing a timestamp keep their relative
/// order and merging an unchanged feed reproduces it exactly.
pub fn merge_feed(
    fresh: Vec<NotificationItem>,
    previous: Vec<NotificationItem>,
    cap: usize,
) -> Vec<NotificationItem> {
    let mut seen = HashSet::with_capacity(fresh.len() + previous.len());
    let mut merged: Vec<NotificationItem> = fresh
        .into_iter()
        .chain(previous)
        .filter(|item| seen.insert(item.id.clone()))
        .collect();

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged.truncate(cap);
    merged
}
