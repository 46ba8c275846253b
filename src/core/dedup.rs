//! Duplicate removal within output buckets.
//!
//! Overlapping date windows, hour-sliced expansion, and date-independent
//! schedule pages all hand the aggregator the same time slot more than once.
//! Within each bucket the first occurrence in aggregation order is kept and
//! later ones are discarded. Buckets left with nothing are dropped, so no
//! empty output file is produced for a bucket that never yielded anything.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;

use crate::core::aggregator::Bucket;
use crate::models::ProgramRecord;

/// Which fields identify a duplicate slot. Selectable per channel in the
/// configuration; the default is the production policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Two records are the same slot when they share `(date, hour)`.
    /// The production policy: re-fetches of a slot may disagree on title or
    /// synopsis formatting, and the first fetch wins.
    #[default]
    DateHour,
    /// Legacy key `(date, hour, title, content)`: tolerates formatting drift
    /// between fetches but lets textually-different duplicates of one slot
    /// through.
    DateHourText,
}

fn slot_key(record: &ProgramRecord, policy: DedupPolicy) -> (String, String, String, String) {
    match policy {
        DedupPolicy::DateHour => (
            record.date.trim().to_string(),
            record.hour.trim().to_string(),
            String::new(),
            String::new(),
        ),
        DedupPolicy::DateHourText => (
            record.date.trim().to_string(),
            record.hour.trim().to_string(),
            record.title.clone(),
            record.content.clone(),
        ),
    }
}

/// Collapse duplicate slots in every bucket, keeping first occurrences, and
/// drop buckets that end up empty.
pub fn remove_duplicates(
    buckets: BTreeMap<String, Bucket>,
    policy: DedupPolicy,
) -> BTreeMap<String, Bucket> {
    let mut filtered = BTreeMap::new();
    for (bucket_key, bucket) in buckets {
        let mut kept = BTreeMap::new();
        let mut removed = 0usize;
        for (date, records) in bucket.into_days() {
            let before = records.len();
            let unique: Vec<ProgramRecord> = records
                .into_iter()
                .unique_by(|record| slot_key(record, policy))
                .collect();
            removed += before - unique.len();
            if !unique.is_empty() {
                kept.insert(date, unique);
            }
        }
        if removed > 0 {
            debug!(bucket = %bucket_key, removed, "Removed duplicate slots");
        }
        let bucket = Bucket::from_days(kept);
        if !bucket.is_empty() {
            filtered.insert(bucket_key, bucket);
        }
    }
    filtered
}
