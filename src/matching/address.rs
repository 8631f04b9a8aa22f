// src/matching/address.rs - Address normalization, tokenization and district inference

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::matching::normalize::{clean_text, collapse_whitespace, replace_non_alnum, split_stuck_words};
use crate::utils::constants::{is_stop_word, SERVICE_AREA_DISTRICTS};

/// Abbreviations expanded as whole tokens, in order.
static ADDRESS_ABBREVIATIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\bJl\.?\b", "Jalan"),
        (r"(?i)\bJln\.?\b", "Jalan"),
        (r"(?i)\bGg\.?\b", "Gang"),
        (r"(?i)\bBr\.?\b", "Banjar"),
        (r"(?i)\bDs\.?\b", "Desa"),
        (r"(?i)\bKel\.?\b", "Kelurahan"),
    ]
    .iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
    .collect()
});

static STREET_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(jalan\s+[a-z0-9\s\-.]{5,})").unwrap());
static PART_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,|]").unwrap());
static HOUSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(no\.?|nomor)\s*([0-9]{1,4}\s*[a-z]?)\b").unwrap());

static DISTRICT_SHORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"kec\.\s*([a-z\s]+)").unwrap());
static DISTRICT_LONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"kecamatan\s+([a-z\s]+)").unwrap());

static ADDRESS_LABEL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(alamat|address)\s*:\s*").unwrap());
static PLUS_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[23456789CFGHJMPQRVWX]{4,8}\+[23456789CFGHJMPQRVWX]{2,4}\b").unwrap()
});

pub fn normalize_address(raw: &str) -> String {
    let mut normalized = split_stuck_words(&clean_text(raw));
    for (pattern, replacement) in ADDRESS_ABBREVIATIONS.iter() {
        normalized = pattern.replace_all(&normalized, *replacement).into_owned();
    }
    collapse_whitespace(&normalized)
}

fn lowered_address_words(raw: &str) -> Vec<String> {
    replace_non_alnum(&normalize_address(raw).to_lowercase())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_house_number(token: &str) -> bool {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    let suffix = &token[digits..];
    (1..=4).contains(&digits)
        && suffix.len() <= 2
        && suffix.chars().all(|c| c.is_ascii_lowercase())
}

fn is_alpha_word(token: &str, min_len: usize) -> bool {
    token.len() >= min_len && token.chars().all(|c| c.is_ascii_lowercase())
}

fn is_roman_numeral(token: &str) -> bool {
    token.len() >= 2 && token.chars().all(|c| "ivxlcdm".contains(c))
}

/// Address tokens: house numbers ("10", "486a"), words of 2+ letters and
/// Roman numerals, minus administrative vocabulary.
pub fn address_tokens(raw: &str) -> HashSet<String> {
    lowered_address_words(raw)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .filter(|t| is_house_number(t) || is_alpha_word(t, 2) || is_roman_numeral(t))
        .collect()
}

/// Stricter subset: alphabetic words of 3+ letters only.
pub fn address_alpha_tokens(raw: &str) -> HashSet<String> {
    lowered_address_words(raw)
        .into_iter()
        .filter(|t| !is_stop_word(t) && is_alpha_word(t, 3))
        .collect()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Infers the district from a listing address: an explicit "kec." /
/// "kecamatan" marker first, then any known service-area district name.
pub fn extract_district(listing_address: &str) -> String {
    let lowered = listing_address.to_lowercase();
    for pattern in [&*DISTRICT_SHORT, &*DISTRICT_LONG] {
        if let Some(captures) = pattern.captures(&lowered) {
            let guess = captures.get(1).map_or("", |m| m.as_str()).trim();
            let guess = guess.split(',').next().unwrap_or("").trim();
            let first_words = guess.split_whitespace().take(3).collect::<Vec<_>>().join(" ");
            return title_case(&first_words);
        }
    }
    SERVICE_AREA_DISTRICTS
        .iter()
        .find(|district| lowered.contains(&district.to_lowercase()))
        .map(|district| district.to_string())
        .unwrap_or_default()
}

/// Short address for lookup queries: the "jalan ..." span (or everything), its
/// first two comma parts, plus the house number when it got cut off.
pub fn compact_address_for_query(raw: &str) -> String {
    let normalized = normalize_address(raw);
    if normalized.is_empty() {
        return String::new();
    }
    let lowered = normalized.to_lowercase();

    let base = STREET_SPAN
        .captures(&normalized)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| normalized.clone());

    let parts: Vec<&str> = PART_SEPARATOR
        .split(&base)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let mut compact = if parts.is_empty() {
        base.clone()
    } else {
        parts.iter().take(2).copied().collect::<Vec<_>>().join(", ")
    };

    if let Some(number) = HOUSE_NUMBER.captures(&lowered).and_then(|c| c.get(2)) {
        let number_text = format!("No {}", number.as_str().trim().to_uppercase());
        if !compact.to_lowercase().contains(&number_text.to_lowercase()) {
            compact = format!("{} {}", compact, number_text);
        }
    }

    collapse_whitespace(&compact)
}

/// Cleans an address scraped from a listing panel: bare labels, label
/// prefixes and Plus Codes go away.
pub fn clean_listing_address(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lowered = trimmed.to_lowercase();
    if lowered == "alamat" || lowered == "address" {
        return String::new();
    }
    let without_label = ADDRESS_LABEL_PREFIX.replace(trimmed, "");
    let without_plus_code = PLUS_CODE.replace_all(&without_label, " ");
    collapse_whitespace(&without_plus_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> HashSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_normalize_address_expands_abbreviations() {
        assert_eq!(normalize_address("Jl Imam Bonjol 10"), "Jalan Imam Bonjol 10");
        assert_eq!(normalize_address("gg Melati br Tegal"), "Gang Melati Banjar Tegal");
        // the trailing dot is not part of a word boundary match
        assert_eq!(normalize_address("Gg. Melati"), "Gang. Melati");
        assert_eq!(normalize_address("Ds Sanur Kel Kesiman"), "Desa Sanur Kelurahan Kesiman");
        assert_eq!(normalize_address("JlnGatot Subroto"), "Jalan Gatot Subroto");
    }

    #[test]
    fn test_normalize_address_keeps_unrelated_words() {
        // "Bri" is not the "Br" abbreviation
        assert_eq!(normalize_address("Kantor Bri Jl Teuku Umar"), "Kantor Bri Jalan Teuku Umar");
        assert_eq!(normalize_address(""), "");
    }

    #[test]
    fn test_address_tokens() {
        assert_eq!(
            address_tokens("Jalan Imam Bonjol No 10"),
            set(&["imam", "bonjol", "10"])
        );
        assert_eq!(
            address_tokens("Jl. Imam Bonjol No. 10, Denpasar Barat"),
            set(&["imam", "bonjol", "10", "barat"])
        );
        assert!(address_tokens("").is_empty());
    }

    #[test]
    fn test_address_tokens_house_numbers() {
        let tokens = address_tokens("Jalan Tukad Badung 486a blok 12345");
        assert!(tokens.contains("486"));
        assert!(!tokens.contains("12345"));
        assert!(tokens.contains("tukad"));
        assert!(is_house_number("486a"));
        assert!(is_house_number("7"));
        assert!(!is_house_number("12345"));
        assert!(!is_house_number("12abc"));
    }

    #[test]
    fn test_address_alpha_tokens() {
        assert_eq!(
            address_alpha_tokens("Jl. Raya Sesetan No 12 A, Kec. Denpasar Selatan"),
            set(&["raya", "sesetan", "selatan"])
        );
    }

    #[test]
    fn test_extract_district() {
        assert_eq!(
            extract_district("Jl. Sudirman, Kec. Denpasar Barat, Kota Denpasar"),
            "Denpasar Barat"
        );
        assert_eq!(
            extract_district("Jalan Hayam Wuruk, Kecamatan Denpasar Timur, Bali"),
            "Denpasar Timur"
        );
        assert_eq!(extract_district("Jl. Gatsu, Denpasar Utara, Bali"), "Denpasar Utara");
        assert_eq!(extract_district("Jl. Gatsu, Bali"), "");
    }

    #[test]
    fn test_compact_address_for_query() {
        assert_eq!(
            compact_address_for_query("Jln Gatot Subroto No 5A, Denpasar"),
            "Jalan Gatot Subroto No 5 A"
        );
        assert_eq!(compact_address_for_query("Jl Imam Bonjol 10"), "Jalan Imam Bonjol 10");
        assert_eq!(
            compact_address_for_query("Banjar Kaja, Sesetan, Denpasar Selatan"),
            "Banjar Kaja, Sesetan"
        );
        assert_eq!(compact_address_for_query("  "), "");
    }

    #[test]
    fn test_clean_listing_address() {
        assert_eq!(clean_listing_address("Alamat"), "");
        assert_eq!(
            clean_listing_address("Alamat: Jl. Teuku Umar No.1, Dauh Puri"),
            "Jl. Teuku Umar No.1, Dauh Puri"
        );
        assert_eq!(
            clean_listing_address("QC7M+2X Dauh Puri Kauh, Denpasar"),
            "Dauh Puri Kauh, Denpasar"
        );
    }
}
