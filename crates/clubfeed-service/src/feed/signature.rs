//! Content fingerprints and change classification.
//!
//! A record is reduced to an ordered tuple of its descriptive fields and
//! hashed. Comparing the hash with the one stored in the watermark tells
//! whether the record is unseen, changed, or unchanged. The hash only has
//! to be deterministic; it is compared against our own stored value and
//! never against untrusted input.

use std::collections::HashSet;

use clubfeed_core::types::kind::SourceKind;
use clubfeed_entity::watermark::WatermarkStore;

/// Separator between fields, so `("ab", "c")` and `("a", "bc")` differ.
const FIELD_SEPARATOR: char = '|';

/// Scope id used in keys for personal-space records.
pub const PERSONAL_SCOPE: &str = "personal";

/// Outcome of comparing a fingerprint with the watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No fingerprint stored for the key.
    New,
    /// A different fingerprint is stored.
    Changed,
    /// The same fingerprint is stored.
    Unchanged,
}

/// Deterministic, order-sensitive hash over trimmed fields. Missing
/// fields count as empty strings.
pub fn fingerprint<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut hash: u64 = 0;
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            hash = roll(hash, FIELD_SEPARATOR as u8);
        }
        for byte in field.unwrap_or("").trim().bytes() {
            hash = roll(hash, byte);
        }
    }
    format!("{hash:016x}")
}

fn roll(hash: u64, byte: u8) -> u64 {
    hash.wrapping_shl(5)
        .wrapping_sub(hash)
        .wrapping_add(u64::from(byte))
}

/// Watermark key of a record: `kind:scopeId:sourceId`.
pub fn signature_key(kind: SourceKind, scope_id: Option<&str>, source_id: &str) -> String {
    format!("{kind}:{}:{source_id}", scope_id.unwrap_or(PERSONAL_SCOPE))
}

/// Compare `fingerprint` with what the watermark holds for `key`.
///
/// Does not touch the watermark; callers record the new fingerprint with
/// [`record`] whatever the outcome.
pub fn classify(key: &str, fingerprint: &str, store: &WatermarkStore) -> Classification {
    match store.signatures.get(key) {
        None => Classification::New,
        Some(previous) if previous == fingerprint => Classification::Unchanged,
        Some(_) => Classification::Changed,
    }
}

/// Store `fingerprint` as the new baseline for `key`.
pub fn record(key: String, fingerprint: String, store: &mut WatermarkStore) {
    store.signatures.insert(key, fingerprint);
}

/// Drop signatures of `kind` whose key is not in `live`.
///
/// Only call this for a kind whose source was read successfully, with
/// `live` holding every key seen in that read. A record that reappears
/// later is reported as new again.
pub fn prune_stale(
    store: &mut WatermarkStore,
    kind: SourceKind,
    live: &HashSet<String>,
) -> usize {
    let prefix = format!("{kind}:");
    let before = store.signatures.len();
    store
        .signatures
        .retain(|key, _| !key.starts_with(&prefix) || live.contains(key));
    before - store.signatures.len()
}
