// src/utils/progress_bars/logging.rs - Logging helpers for the resolution run
use log::{debug, info, warn};
use std::time::Instant;

use crate::models::core::{Coordinates, Outcome};
use crate::models::matching::ScoreResult;
use crate::models::stats_models::RunSummary;

#[derive(Clone)]
pub struct ResolverLogger {
    component: &'static str,
    emoji: &'static str,
    start_time: Instant,
}

impl Default for ResolverLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn format_coords(coords: Option<Coordinates>) -> String {
    match coords {
        Some(c) => format!("({}, {})", c.latitude, c.longitude),
        None => "(-, -)".to_string(),
    }
}

impl ResolverLogger {
    pub fn new() -> Self {
        Self {
            component: "RESOLVER",
            emoji: "📍",
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, record_count: usize, threshold_ok: f64, threshold_early_stop: f64) {
        info!(
            "[{}] {} 🚀 Starting place resolution for {} records (run ID: {})",
            self.component, self.emoji, record_count, run_id
        );
        info!(
            "[{}] {} ⚙️  Configuration: accept threshold {:.2}, early-stop threshold {:.2}",
            self.component, self.emoji, threshold_ok, threshold_early_stop
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.component, self.emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.component, self.emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_record_start(&self, name: &str, query_count: usize) {
        debug!(
            "[{}] {} 🔍 {} | {} queries",
            self.component, self.emoji, name, query_count
        );
    }

    pub fn log_query(&self, query: &str) {
        debug!("[{}] {}    ▶ query: {}", self.component, self.emoji, query);
    }

    pub fn log_list_ranking(&self, hit_count: usize, opened: usize) {
        debug!(
            "[{}] {}    list mode: {} hits ranked, opening top {}",
            self.component, self.emoji, hit_count, opened
        );
    }

    pub fn log_candidate(
        &self,
        source: &str,
        result: &ScoreResult,
        coords: Option<Coordinates>,
        name: &str,
        address: &str,
    ) {
        let d = &result.diagnostics;
        debug!(
            "[{}] {}    • {} | score={:.2} (ov_addr={}, ov_name={}, s_name={:.2}, fuz={:.2}, s_addr={:.2}, echo={}, gen={}) | latlon={} | nama={} | alamat={}",
            self.component,
            self.emoji,
            source,
            result.score,
            d.ov_addr,
            d.ov_name,
            d.s_name,
            d.s_name_fuzzy,
            d.s_addr,
            d.is_echo,
            d.is_generic,
            format_coords(coords),
            name,
            address
        );
    }

    pub fn log_early_stop(&self, score: f64) {
        debug!(
            "[{}] {}    ⏹️  Confident match (score={:.2}), skipping remaining queries",
            self.component, self.emoji, score
        );
    }

    pub fn log_lookup_failed(&self, query: &str, error: &anyhow::Error) {
        warn!(
            "[{}] {} ⚠️  Lookup failed for query '{}': {:#}",
            self.component, self.emoji, query, error
        );
    }

    pub fn log_verdict(&self, index: usize, score: Option<f64>, source: Option<&str>, outcome: &Outcome) {
        info!(
            "[{}] {} ✅ Record {} | best_score={} | source={} | latlon={} | kode={} | {}",
            self.component,
            self.emoji,
            index,
            score.map_or("-".to_string(), |s| format!("{:.2}", s)),
            source.unwrap_or("-"),
            format_coords(outcome.coordinates),
            outcome.status_code,
            outcome.status_label
        );
    }

    pub fn log_completion(&self, summary: &RunSummary) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED: {} records resolved in {:.2?}",
            self.component, self.emoji, summary.records_total, duration
        );
        info!(
            "[{}] {} 📊 Results: {:.1}% resolved, {} skipped, {} prefilled, {} failed, {} failed lookups",
            self.component,
            self.emoji,
            summary.resolved_rate() * 100.0,
            summary.records_skipped,
            summary.records_prefilled,
            summary.records_failed,
            summary.lookups_failed
        );
        for (code, count) in &summary.status_counts {
            info!(
                "[{}] {}    status {}: {} records",
                self.component, self.emoji, code, count
            );
        }
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.component, self.emoji, message);
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[{}] {} {}", self.component, self.emoji, message);
    }
}
