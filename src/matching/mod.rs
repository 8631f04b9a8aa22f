// src/matching/mod.rs
pub mod address;
pub mod classifier;
pub mod closed;
pub mod decision;
pub mod geospatial;
pub mod name;
pub mod normalize;
pub mod scoring;
pub mod similarity;

// Re-export the engine entry points for clean API
pub use classifier::{is_generic_place_name, looks_like_query_echo};
pub use decision::{coords_only_guard_ok, decide, is_confident_in_area, should_stop_search};
pub use geospatial::{is_within_service_area, parse_coords_from_url};
pub use scoring::{apply_coords_only_boost, quick_score_from_list, score_candidate};
