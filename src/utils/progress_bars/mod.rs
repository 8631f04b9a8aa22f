// src/utils/progress_bars/mod.rs
pub mod logging;
pub mod progress_config;
