//! Record accumulation into per-output buckets.
//!
//! A [`Bucket`] holds every record destined for one output file (one plain
//! channel, or one sub-channel of a fan-out source), grouped by date so the
//! serializer can detect date boundaries. The [`Aggregator`] owns the bucket
//! map for exactly one channel run; nothing here outlives the run.

use std::collections::BTreeMap;

use crate::models::ProgramRecord;

/// All records accumulated for one output file, grouped by date.
///
/// Within a date group, records stay in aggregation (insertion) order; the
/// duplicate remover's first-occurrence-wins rule depends on that.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    days: BTreeMap<String, Vec<ProgramRecord>>,
}

impl Bucket {
    /// Append processed records from one URL, grouping them by date.
    pub fn append(&mut self, records: Vec<ProgramRecord>) {
        for record in records {
            self.days.entry(record.date.clone()).or_default().push(record);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(|records| records.is_empty())
    }

    /// Every record, sorted by `(date, hour)`. The sort is stable, so
    /// records sharing a slot keep their insertion order.
    pub fn sorted_records(&self) -> Vec<&ProgramRecord> {
        let mut records: Vec<&ProgramRecord> = self.days.values().flatten().collect();
        records.sort_by(|a, b| (&a.date, &a.hour).cmp(&(&b.date, &b.hour)));
        records
    }

    pub(crate) fn from_days(days: BTreeMap<String, Vec<ProgramRecord>>) -> Self {
        Self { days }
    }

    pub(crate) fn into_days(self) -> BTreeMap<String, Vec<ProgramRecord>> {
        self.days
    }
}

/// The bucket map for one channel run, keyed by output file name.
#[derive(Debug, Default)]
pub struct Aggregator {
    buckets: BTreeMap<String, Bucket>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one URL's records to the named bucket, creating it if this is
    /// the first successful payload for that output.
    pub fn append(&mut self, bucket_key: &str, records: Vec<ProgramRecord>) {
        self.buckets
            .entry(bucket_key.to_string())
            .or_default()
            .append(records);
    }

    pub fn into_buckets(self) -> BTreeMap<String, Bucket> {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, hour: &str, title: &str) -> ProgramRecord {
        ProgramRecord {
            date: date.to_string(),
            hour: hour.to_string(),
            title: title.to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn test_records_group_by_date_in_insertion_order() {
        let mut bucket = Bucket::default();
        bucket.append(vec![
            record("2025-03-02", "21:00", "b"),
            record("2025-03-01", "09:00", "a"),
            record("2025-03-02", "08:00", "c"),
        ]);
        let days = bucket.into_days();
        let dates: Vec<_> = days.keys().cloned().collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-03-02"]);
        let second_day = &days["2025-03-02"];
        assert_eq!(second_day[0].title, "b");
        assert_eq!(second_day[1].title, "c");
    }

    #[test]
    fn test_sorted_records_order_by_date_then_hour() {
        let mut bucket = Bucket::default();
        bucket.append(vec![
            record("2025-03-02", "21:00", "late"),
            record("2025-03-02", "08:00", "early"),
            record("2025-03-01", "23:30", "eve"),
        ]);
        let titles: Vec<_> = bucket.sorted_records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["eve", "early", "late"]);
    }

    #[test]
    fn test_aggregator_keeps_buckets_separate() {
        let mut aggregator = Aggregator::new();
        aggregator.append("A", vec![record("2025-03-01", "10:00", "on a")]);
        aggregator.append("B", vec![record("2025-03-01", "10:00", "on b")]);
        aggregator.append("A", vec![record("2025-03-01", "11:00", "more a")]);
        let buckets = aggregator.into_buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets["A"].sorted_records().len(), 2);
        assert_eq!(buckets["B"].sorted_records().len(), 1);
    }

    #[test]
    fn test_empty_append_still_creates_the_bucket() {
        let mut aggregator = Aggregator::new();
        aggregator.append("A", Vec::new());
        let buckets = aggregator.into_buckets();
        assert!(buckets.contains_key("A"));
        assert!(buckets["A"].is_empty());
    }
}
