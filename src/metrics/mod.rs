use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Entries kept before the oldest ones are evicted.
pub const MAX_ENTRIES: usize = 10_000;

/// One recorded step of a verification.
#[derive(Debug, Clone, Serialize)]
pub struct MetricEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: String, // "lookup" | "deliver"
    pub outcome: String,   // "original" | "fake" | "not_available" | "sent" | "failed"
    pub duration_ns: u64,
    pub success: bool,
    pub notes: Option<String>,
}

impl MetricEntry {
    pub fn new(
        operation: impl Into<String>,
        outcome: impl Into<String>,
        duration_ns: u64,
        success: bool,
        notes: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            outcome: outcome.into(),
            duration_ns,
            success,
            notes,
        }
    }
}

/// Rolling window of the most recent verification steps. Totals cover the
/// whole process lifetime, including evicted entries.
#[derive(Debug)]
pub struct MetricsStore {
    pub entries: VecDeque<MetricEntry>,
    limit: usize,
    recorded: u64,
    failed: u64,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::with_limit(MAX_ENTRIES)
    }
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit.min(MAX_ENTRIES)),
            limit,
            recorded: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, entry: MetricEntry) {
        self.recorded += 1;
        if !entry.success {
            self.failed += 1;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries recorded since startup.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Failed entries recorded since startup.
    pub fn failures(&self) -> u64 {
        self.failed
    }

    /// The most recent failed entries, newest first.
    pub fn recent_failures(&self, limit: usize) -> Vec<&MetricEntry> {
        self.entries.iter().rev().filter(|e| !e.success).take(limit).collect()
    }

    /// Aggregate stats per (operation, outcome) pair.
    pub fn aggregated(&self) -> Vec<AggregatedMetric> {
        let mut map: HashMap<(&str, &str), Vec<&MetricEntry>> = HashMap::new();

        for e in &self.entries {
            map.entry((e.operation.as_str(), e.outcome.as_str()))
                .or_default()
                .push(e);
        }

        let mut out: Vec<AggregatedMetric> = map
            .into_iter()
            .map(|((op, outcome), entries)| {
                let count = entries.len();
                let mut sorted: Vec<u64> = entries.iter().map(|e| e.duration_ns).collect();
                sorted.sort_unstable();
                let total: u64 = sorted.iter().sum();
                let p95 = sorted[((count as f64 * 0.95) as usize).min(count - 1)];

                AggregatedMetric {
                    operation: op.to_string(),
                    outcome: outcome.to_string(),
                    sample_count: count,
                    failures: entries.iter().filter(|e| !e.success).count(),
                    min_ns: sorted[0],
                    max_ns: sorted[count - 1],
                    avg_ns: total / count as u64,
                    p50_ns: sorted[count / 2],
                    p95_ns: p95,
                }
            })
            .collect();

        out.sort_by(|a, b| a.operation.cmp(&b.operation).then(a.outcome.cmp(&b.outcome)));
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedMetric {
    pub operation: String,
    pub outcome: String,
    pub sample_count: usize,
    pub failures: usize,
    pub min_ns: u64,
    pub max_ns: u64,
    pub avg_ns: u64,
    pub p50_ns: u64,
    pub p95_ns: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_aggregates_to_nothing() {
        let store = MetricsStore::new();
        assert!(store.aggregated().is_empty());
        assert_eq!(store.failures(), 0);
    }

    #[test]
    fn groups_by_operation_and_outcome() {
        let mut store = MetricsStore::new();
        store.record(MetricEntry::new("lookup", "fake", 300, true, None));
        store.record(MetricEntry::new("lookup", "fake", 100, true, None));
        store.record(MetricEntry::new("lookup", "original", 50, true, None));
        store.record(MetricEntry::new(
            "deliver",
            "failed",
            900,
            false,
            Some("HTTP 401".into()),
        ));

        let agg = store.aggregated();
        let keys: Vec<(&str, &str)> = agg
            .iter()
            .map(|a| (a.operation.as_str(), a.outcome.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("deliver", "failed"), ("lookup", "fake"), ("lookup", "original")]
        );

        let fake = &agg[1];
        assert_eq!(fake.sample_count, 2);
        assert_eq!(fake.min_ns, 100);
        assert_eq!(fake.max_ns, 300);
        assert_eq!(fake.avg_ns, 200);
        assert_eq!(agg[0].failures, 1);
        assert_eq!(store.failures(), 1);
    }

    #[test]
    fn recent_failures_are_newest_first() {
        let mut store = MetricsStore::new();
        for (i, ok) in [false, true, false, false].into_iter().enumerate() {
            store.record(MetricEntry::new("deliver", "x", 1, ok, Some(i.to_string())));
        }

        let notes: Vec<&str> = store
            .recent_failures(2)
            .iter()
            .filter_map(|e| e.notes.as_deref())
            .collect();
        assert_eq!(notes, vec!["3", "2"]);
    }

    #[test]
    fn store_stays_at_its_limit() {
        let mut store = MetricsStore::with_limit(100);
        for i in 0..1_000u64 {
            store.record(MetricEntry::new("lookup", "fake", i, i % 10 != 0, None));
        }

        assert_eq!(store.entries.len(), 100);
        assert_eq!(store.entries.front().unwrap().duration_ns, 900);
        assert_eq!(store.entries.back().unwrap().duration_ns, 999);
        assert_eq!(store.recorded(), 1_000);
        assert_eq!(store.failures(), 100);
        assert_eq!(store.aggregated()[0].sample_count, 100);
    }

    #[test]
    fn default_limit_is_max_entries() {
        let mut store = MetricsStore::new();
        for _ in 0..MAX_ENTRIES + 5 {
            store.record(MetricEntry::new("deliver", "sent", 1, true, None));
        }
        assert_eq!(store.entries.len(), MAX_ENTRIES);
        assert_eq!(store.recorded(), (MAX_ENTRIES + 5) as u64);
    }
}
