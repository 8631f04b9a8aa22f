// src/utils/config.rs - Tunable thresholds, weights and bonuses for the resolver

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::utils::constants::{
    DEFAULT_AREA_NAME, DEFAULT_CITY_CONTEXT, DEFAULT_CITY_KEYWORD, SERVICE_AREA_LAT_MAX,
    SERVICE_AREA_LAT_MIN, SERVICE_AREA_LON_MAX, SERVICE_AREA_LON_MIN,
};

/// Rectangular latitude/longitude bound a match must fall into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceArea {
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for ServiceArea {
    fn default() -> Self {
        Self {
            name: DEFAULT_AREA_NAME.to_string(),
            lat_min: SERVICE_AREA_LAT_MIN,
            lat_max: SERVICE_AREA_LAT_MAX,
            lon_min: SERVICE_AREA_LON_MIN,
            lon_max: SERVICE_AREA_LON_MAX,
        }
    }
}

/// Name/address weight pair used for the weighted part of a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub name: f64,
    pub address: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Minimum character ratio for two tokens to count as the same soft token.
    pub soft_token_threshold: f64,
    /// Echo: fuzzy similarity to the query when the name also carries the city context.
    pub echo_fuzzy_with_context: f64,
    /// Echo: fuzzy similarity to the query that is enough on its own.
    pub echo_fuzzy_alone: f64,
    /// Echo: share of the query whose verbatim prefix inside the name marks an echo.
    pub echo_prefix_fraction: f64,
    pub echo_prefix_min_chars: usize,
    pub echo_min_commas: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            soft_token_threshold: 0.88,
            echo_fuzzy_with_context: 0.78,
            echo_fuzzy_alone: 0.90,
            echo_prefix_fraction: 0.55,
            echo_prefix_min_chars: 12,
            echo_min_commas: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub city_bonus: f64,
    pub district_match_bonus: f64,
    pub district_mismatch_penalty: f64,
    /// Bonus for 1, 2, 3 and 4+ shared address tokens.
    pub address_overlap_bonus: [f64; 4],
    /// Bonus for 1, 2 and 3+ shared (soft) name tokens.
    pub name_overlap_bonus: [f64; 3],
    /// Name similarity above which a listing without address is penalised less.
    pub missing_address_strong_name: f64,
    pub missing_address_penalty_strong_name: f64,
    pub missing_address_penalty: f64,
    pub echo_penalty: f64,
    pub generic_penalty: f64,
    /// Input addresses with fewer tokens than this are considered too weak to weigh.
    pub weak_address_min_tokens: usize,
    pub weak_address_weights: Weights,
    pub strong_name_for_weights: f64,
    pub strong_name_weights: Weights,
    pub default_weights: Weights,
    pub max_score: f64,
    /// Extra ranking bonus for list hints that mention the city keyword.
    pub list_city_bonus: f64,
    /// Extra ranking bonus for list hints that mention the input district.
    pub list_district_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            city_bonus: 0.05,
            district_match_bonus: 0.06,
            district_mismatch_penalty: 0.03,
            address_overlap_bonus: [0.05, 0.10, 0.14, 0.18],
            name_overlap_bonus: [0.03, 0.07, 0.09],
            missing_address_strong_name: 0.78,
            missing_address_penalty_strong_name: 0.08,
            missing_address_penalty: 0.18,
            echo_penalty: 0.35,
            generic_penalty: 0.18,
            weak_address_min_tokens: 2,
            weak_address_weights: Weights { name: 0.78, address: 0.22 },
            strong_name_for_weights: 0.75,
            strong_name_weights: Weights { name: 0.60, address: 0.40 },
            default_weights: Weights { name: 0.35, address: 0.65 },
            max_score: 1.2,
            list_city_bonus: 0.04,
            list_district_bonus: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// "Name very strong" lets a candidate through even below the accept threshold.
    pub very_strong_name: f64,
    pub very_strong_containment: f64,
    pub very_strong_fuzzy: f64,
    /// Non-trivial name signal used by the generic guard and the empty-address branch.
    pub signal_name_overlap: usize,
    pub signal_fuzzy: f64,
    pub signal_name: f64,
    /// Address strength that rescues a generic candidate.
    pub generic_strong_address_overlap: usize,
    pub generic_strong_address_similarity: f64,
    /// Near-exact name similarity that skips the address lock.
    pub exact_name: f64,
    pub address_lock_min_alpha_tokens: usize,
    pub address_lock_overlap: usize,
    pub address_lock_similarity: f64,
    /// Coords-only guard, calibrated separately from the generic guard.
    pub coords_only_name_overlap: usize,
    pub coords_only_name: f64,
    pub coords_only_fuzzy: f64,
    /// Early-stop strength checks.
    pub early_stop_name: f64,
    pub early_stop_fuzzy: f64,
    pub early_stop_address_overlap: usize,
    pub early_stop_address_similarity: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            very_strong_name: 0.78,
            very_strong_containment: 0.70,
            very_strong_fuzzy: 0.80,
            signal_name_overlap: 1,
            signal_fuzzy: 0.55,
            signal_name: 0.50,
            generic_strong_address_overlap: 3,
            generic_strong_address_similarity: 0.35,
            exact_name: 0.92,
            address_lock_min_alpha_tokens: 2,
            address_lock_overlap: 2,
            address_lock_similarity: 0.18,
            coords_only_name_overlap: 1,
            coords_only_name: 0.50,
            coords_only_fuzzy: 0.55,
            early_stop_name: 0.82,
            early_stop_fuzzy: 0.85,
            early_stop_address_overlap: 3,
            early_stop_address_similarity: 0.28,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// City keyword implied by a lookup context: its first comma-separated part,
/// lower-cased ("Badung, Bali, Indonesia" gives "badung").
pub fn city_keyword_from_context(context: &str) -> String {
    context
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Every tunable number the engine uses, in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub city_context: String,
    pub city_keyword: String,
    pub service_area: ServiceArea,
    /// Score at which a candidate is accepted.
    pub threshold_ok: f64,
    /// Score at which the search loop may stop early.
    pub threshold_early_stop: f64,
    pub allow_coords_only_match: bool,
    /// Score given to a candidate that scored nothing but still has coordinates.
    pub coords_only_boost_score: f64,
    pub max_candidates: usize,
    pub top_open: usize,
    pub max_queries: usize,
    pub similarity: SimilarityConfig,
    pub scoring: ScoringConfig,
    pub decision: DecisionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            city_context: DEFAULT_CITY_CONTEXT.to_string(),
            city_keyword: DEFAULT_CITY_KEYWORD.to_string(),
            service_area: ServiceArea::default(),
            threshold_ok: 0.45,
            threshold_early_stop: 0.70,
            allow_coords_only_match: true,
            coords_only_boost_score: 0.12,
            max_candidates: 10,
            top_open: 2,
            max_queries: 4,
            similarity: SimilarityConfig::default(),
            scoring: ScoringConfig::default(),
            decision: DecisionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults with the operational knobs overridden from the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let city_context = non_empty_var("MATCH_CITY_CONTEXT");
        let config = Self {
            threshold_ok: env::var("MATCH_THRESHOLD_OK")
                .unwrap_or_else(|_| defaults.threshold_ok.to_string())
                .parse()
                .unwrap_or(defaults.threshold_ok),
            threshold_early_stop: env::var("MATCH_THRESHOLD_EARLY_STOP")
                .unwrap_or_else(|_| defaults.threshold_early_stop.to_string())
                .parse()
                .unwrap_or(defaults.threshold_early_stop),
            city_context: city_context.clone().unwrap_or_else(|| defaults.city_context.clone()),
            city_keyword: non_empty_var("MATCH_CITY_KEYWORD")
                .map(|v| v.to_lowercase())
                .or_else(|| city_context.as_deref().map(city_keyword_from_context))
                .unwrap_or_else(|| defaults.city_keyword.clone()),
            allow_coords_only_match: env::var("MATCH_ALLOW_COORDS_ONLY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(defaults.allow_coords_only_match),
            max_candidates: env::var("MATCH_MAX_CANDIDATES")
                .unwrap_or_else(|_| defaults.max_candidates.to_string())
                .parse()
                .unwrap_or(defaults.max_candidates),
            top_open: env::var("MATCH_TOP_OPEN")
                .unwrap_or_else(|_| defaults.top_open.to_string())
                .parse()
                .unwrap_or(defaults.top_open),
            ..defaults
        };
        debug!(
            "Engine config: threshold_ok={}, threshold_early_stop={}, coords_only={}, city_context={:?}, city_keyword={:?}",
            config.threshold_ok,
            config.threshold_early_stop,
            config.allow_coords_only_match,
            config.city_context,
            config.city_keyword
        );
        config
    }

    /// Loads a full configuration from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse engine config {}", path.display()))
    }
}
