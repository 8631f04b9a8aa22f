// src/utils/constants.rs

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// City context appended to every lookup query and used for echo detection.
pub const DEFAULT_CITY_CONTEXT: &str = "Denpasar, Bali, Indonesia";
/// Lower-cased keyword whose presence in a listing address earns the city bonus.
pub const DEFAULT_CITY_KEYWORD: &str = "denpasar";
pub const DEFAULT_AREA_NAME: &str = "Denpasar";

/// Service-area bounding box (inclusive on every edge).
pub const SERVICE_AREA_LAT_MIN: f64 = -8.752640565327079;
pub const SERVICE_AREA_LAT_MAX: f64 = -8.592768863988631;
pub const SERVICE_AREA_LON_MIN: f64 = 115.17372541407495;
pub const SERVICE_AREA_LON_MAX: f64 = 115.27485445343008;

/// Districts (kecamatan) inside the service area, used when a listing address
/// carries no explicit "kec." marker.
pub const SERVICE_AREA_DISTRICTS: [&str; 4] = [
    "Denpasar Selatan",
    "Denpasar Timur",
    "Denpasar Barat",
    "Denpasar Utara",
];

/// Titles the lookup source shows instead of a real place name.
pub const PLACEHOLDER_TITLES: [&str; 3] = ["hasil", "result", "results"];

/// Administrative and locational vocabulary dropped from both name and address tokens.
pub const STOP_WORDS: [&str; 45] = [
    "jalan", "gang", "banjar", "br", "dk", "dusun", "denpasar", "bali", "indonesia", "kecamatan",
    "kec", "kelurahan", "kel", "desa", "rt", "rw", "kota", "kab", "kabupaten", "prov", "provinsi",
    "jl", "jln", "gg", "no", "nomor", "nmr", "gn", "gunung", "blok", "block", "lantai", "lt",
    "komplek", "kompleks", "kompleksnya", "kompleksperum", "perum", "perumahan", "ruko", "kav",
    "kavling", "km", "meter", "ggg",
];

pub static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}

pub fn is_placeholder_title(title: &str) -> bool {
    let lowered = title.trim().to_lowercase();
    PLACEHOLDER_TITLES.contains(&lowered.as_str())
}
