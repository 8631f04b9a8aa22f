// src/matching/closed.rs - Closed-business detection from listing panel text

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::core::{ClosedStatus, ClosedType};

/// Checked in order; the first phrase found decides the closure type.
const CLOSED_PHRASES: [&str; 9] = [
    "permanently closed",
    "temporarily closed",
    "closed permanently",
    "closed temporarily",
    "tutup permanen",
    "ditutup permanen",
    "tutup sementara",
    "ditutup sementara",
    "secara permanen ditutup",
];

static CLOSED_PATTERNS: Lazy<Vec<(Regex, ClosedType)>> = Lazy::new(|| {
    CLOSED_PHRASES
        .iter()
        .map(|phrase| {
            let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).unwrap();
            (pattern, closed_type_of(phrase))
        })
        .collect()
});

fn closed_type_of(phrase: &str) -> ClosedType {
    if phrase.contains("temporar") || phrase.contains("sementara") {
        ClosedType::Temporary
    } else if phrase.contains("permanen") {
        ClosedType::Permanent
    } else {
        ClosedType::Unknown
    }
}

pub fn detect_closed_status(panel_text: &str) -> ClosedStatus {
    CLOSED_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(panel_text))
        .map(|(_, closed_type)| ClosedStatus::closed(*closed_type))
        .unwrap_or_else(ClosedStatus::open)
}
