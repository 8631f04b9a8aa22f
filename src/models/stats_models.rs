// src/models/stats_models.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Per-run counters, logged and optionally written next to the output.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub records_total: usize,
    pub records_skipped: usize,
    pub records_prefilled: usize,
    pub records_failed: usize,
    pub lookups_failed: usize,
    /// Number of records per output status code.
    pub status_counts: BTreeMap<i32, usize>,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            records_total: 0,
            records_skipped: 0,
            records_prefilled: 0,
            records_failed: 0,
            lookups_failed: 0,
            status_counts: BTreeMap::new(),
        }
    }

    pub fn record_status(&mut self, status_code: i32) {
        self.records_total += 1;
        *self.status_counts.entry(status_code).or_insert(0) += 1;
    }

    pub fn count_for(&self, status_code: i32) -> usize {
        self.status_counts.get(&status_code).copied().unwrap_or(0)
    }

    /// Share of records resolved to found, closed or coords-only.
    pub fn resolved_rate(&self) -> f64 {
        if self.records_total == 0 {
            return 0.0;
        }
        let resolved = self.count_for(1) + self.count_for(3) + self.count_for(5);
        resolved as f64 / self.records_total as f64
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed_secs(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts() {
        let mut summary = RunSummary::new();
        summary.record_status(1);
        summary.record_status(1);
        summary.record_status(99);
        summary.record_status(5);
        assert_eq!(summary.records_total, 4);
        assert_eq!(summary.count_for(1), 2);
        assert_eq!(summary.count_for(0), 0);
        assert!((summary.resolved_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_rate() {
        let mut summary = RunSummary::new();
        summary.finish();
        assert_eq!(summary.resolved_rate(), 0.0);
        assert!(summary.finished_at.is_some());
        assert!(Uuid::parse_str(&summary.run_id).is_ok());
    }
}
