// src/matching/normalize.rs - Shared text cleanup for names, addresses and queries

use once_cell::sync::Lazy;
use regex::Regex;

static ANGLE_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[<>]").unwrap());
static RT_RW_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bRT\s*\d+/?\s*RW\s*\d+\b").unwrap());
static RT_ALONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bRT\s*\d+\b").unwrap());
static RW_ALONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bRW\s*\d+\b").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());
static LETTER_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z])(\d)").unwrap());
static DIGIT_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)([A-Za-z])").unwrap());

static NON_ALNUM_LOWER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

/// Turns a raw spreadsheet cell into a plain string: absent and "nan" become empty.
pub fn sanitize_cell(value: Option<&str>) -> String {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.eq_ignore_ascii_case("nan") {
                String::new()
            } else {
                trimmed.to_string()
            }
        }
        None => String::new(),
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Drops angle brackets and RT/RW neighbourhood codes, collapses whitespace.
pub fn clean_text(raw: &str) -> String {
    let text = ANGLE_BRACKETS.replace_all(raw, " ");
    let text = RT_RW_PAIR.replace_all(&text, " ");
    let text = RT_ALONE.replace_all(&text, " ");
    let text = RW_ALONE.replace_all(&text, " ");
    collapse_whitespace(&text)
}

/// Separates words that were glued together: "JalanIMAM" -> "Jalan IMAM",
/// "No486A" -> "No 486 A".
pub fn split_stuck_words(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = LOWER_UPPER.replace_all(text, "${1} ${2}");
    let text = LETTER_DIGIT.replace_all(&text, "${1} ${2}");
    DIGIT_LETTER.replace_all(&text, "${1} ${2}").into_owned()
}

/// Replaces everything outside `[a-z0-9\s]` with spaces. Expects lower-cased input.
pub fn replace_non_alnum(lowered: &str) -> String {
    NON_ALNUM_LOWER.replace_all(lowered, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_cell() {
        assert_eq!(sanitize_cell(None), "");
        assert_eq!(sanitize_cell(Some("  NaN ")), "");
        assert_eq!(sanitize_cell(Some(" Toko Maju ")), "Toko Maju");
    }

    #[test]
    fn test_clean_text_strips_rt_rw_codes() {
        assert_eq!(
            clean_text("Jl. Kenyeri RT 02/RW 05 <Gg. II>"),
            "Jl. Kenyeri Gg. II"
        );
        assert_eq!(clean_text("Banjar Tengah rt3 rw 4"), "Banjar Tengah");
        assert_eq!(clean_text("RW 12 Dusun Kaja"), "Dusun Kaja");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_split_stuck_words() {
        assert_eq!(split_stuck_words("JalanIMAM"), "Jalan IMAM");
        assert_eq!(split_stuck_words("No486A"), "No 486 A");
        assert_eq!(split_stuck_words("StreetNAME123B"), "Street NAME 123 B");
        assert_eq!(split_stuck_words(""), "");
    }

    #[test]
    fn test_replace_non_alnum() {
        assert_eq!(replace_non_alnum("toko-maju, no.5"), "toko maju  no 5");
    }
}
