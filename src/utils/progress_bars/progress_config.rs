// src/utils/progress_bars/progress_config.rs

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::env;
use std::time::Duration;

/// Configuration for the batch progress bar
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show the progress bar at all
    pub enabled: bool,
    /// Refresh rate for the spinner in milliseconds
    pub refresh_rate_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_rate_ms: 100,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("PROGRESS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            refresh_rate_ms: env::var("PROGRESS_REFRESH_RATE_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
        }
    }

    /// Progress bar over `len` records; hidden when progress is disabled.
    pub fn create_progress_bar(&self, len: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_bar().template(
            "  📍 [{elapsed_precise}] {bar:30.green/blue} {pos}/{len} {msg}",
        ) {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        pb.enable_steady_tick(Duration::from_millis(self.refresh_rate_ms.max(1)));
        pb
    }
}
