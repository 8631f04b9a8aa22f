// src/matching/name.rs - Business name normalization, tokens and abbreviations

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::matching::normalize::{clean_text, collapse_whitespace, replace_non_alnum, split_stuck_words};
use crate::utils::constants::is_stop_word;

pub const MIN_NAME_TOKEN_LENGTH: usize = 2;
const MAX_ACRONYM_WORDS: usize = 8;

/// Business-type words that say nothing about which business it is.
pub const GENERIC_NAME: [&str; 35] = [
    "warung", "toko", "ud", "cv", "pt", "resto", "restaurant", "cafe", "kedai", "depot",
    "laundry", "salon", "barber", "bengkel", "apotek", "klinik", "clinic", "fotocopy", "foto",
    "mart", "mini", "market", "shop", "store", "service", "jasa", "hasil", "sewa", "kost", "kos",
    "kontrakan", "homestay", "guesthouse", "villa", "hotel",
];

/// Cooperative and association vocabulary dropped from name tokens.
pub const NAME_STOP_EXTRA: [&str; 12] = [
    "koperasi", "kpn", "ksp", "ksu", "kud", "lpd", "yayasan", "perkumpulan", "asosiasi", "serba",
    "usaha", "konsumen",
];

/// Auspicious suffixes that half the businesses in town carry.
pub const COMMON_SUFFIX: [&str; 17] = [
    "jaya", "abadi", "makmur", "sentosa", "sejahtera", "berkah", "mulya", "utama", "sukses",
    "prima", "indo", "nusantara", "mandiri", "karya", "agung", "barokah", "barakah",
];

pub const LEGAL_ENTITY_TOKENS: [&str; 7] = ["ud", "cv", "pt", "tbk", "t bk", "t.bk", "persero"];

static GENERIC_NAME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| GENERIC_NAME.iter().copied().collect());
static NAME_STOP_EXTRA_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NAME_STOP_EXTRA.iter().copied().collect());
static COMMON_SUFFIX_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| COMMON_SUFFIX.iter().copied().collect());
static LEGAL_ENTITY_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| LEGAL_ENTITY_TOKENS.iter().copied().collect());

static NAME_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/,_\-]+").unwrap());

/// Applied in order to the lower-cased name; each match becomes a space.
static NAME_NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\(.*?\)",
        r"(?i)\b(persero|tbk|t\.bk)\b",
        r"(?i)\b(denpasar|bali|indonesia)\b",
        r"(?i)\b(kantor|office|cabang|unit|pusat)\b.*$",
        r"(?i)\b(pemerintah|pemkot|pemkab)\b.*$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static ABBREVIATION_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]+$").unwrap());

pub fn is_generic_word(token: &str) -> bool {
    GENERIC_NAME_SET.contains(token)
}

pub fn is_common_suffix(token: &str) -> bool {
    COMMON_SUFFIX_SET.contains(token)
}

pub fn is_legal_entity_token(token: &str) -> bool {
    LEGAL_ENTITY_SET.contains(token)
}

/// Lower-cased canonical name: glued words split, "&" spelled out, separators
/// dropped, then parentheticals, legal forms, place names and everything
/// after an office/branch or government marker stripped.
pub fn normalize_name(raw: &str) -> String {
    let text = split_stuck_words(&clean_text(raw)).replace('&', " dan ");
    let text = NAME_SEPARATORS.replace_all(&text, " ");
    let mut lowered = collapse_whitespace(&text).to_lowercase();
    for pattern in NAME_NOISE_PATTERNS.iter() {
        lowered = collapse_whitespace(&pattern.replace_all(&lowered, " "));
    }
    lowered
}

/// Distinctive name tokens: no stop words, no business-type words, no
/// cooperative/association vocabulary, nothing shorter than two characters.
pub fn name_tokens(raw: &str) -> HashSet<String> {
    replace_non_alnum(&normalize_name(raw))
        .split_whitespace()
        .filter(|t| t.len() >= MIN_NAME_TOKEN_LENGTH)
        .filter(|t| !is_stop_word(t) && !is_generic_word(t) && !NAME_STOP_EXTRA_SET.contains(*t))
        .map(str::to_string)
        .collect()
}

/// Lower-cased text with punctuation and locational stop words removed.
pub fn strip_loc_words(text: &str) -> String {
    replace_non_alnum(&text.to_lowercase())
        .split_whitespace()
        .filter(|t| !is_stop_word(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// First letters of the significant words of a listing name, upper-cased.
pub fn acronym_of_words(raw: &str) -> String {
    replace_non_alnum(&raw.to_lowercase())
        .split_whitespace()
        .filter(|t| t.len() >= 2 && !is_generic_word(t) && !is_stop_word(t))
        .take(MAX_ACRONYM_WORDS)
        .filter_map(|t| t.chars().next())
        .collect::<String>()
        .to_uppercase()
}

/// The abbreviation an input name may be written as: a short leading
/// all-caps/digit token ("BPD Bali" -> "BPD"), otherwise the caps and digits
/// of the whole name when there are only a few of them.
pub fn abbrev_input(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let first = upper.split_whitespace().next().unwrap_or("");
    let first_len = first.chars().count();
    if (2..=6).contains(&first_len) && ABBREVIATION_TOKEN.is_match(first) {
        return first.to_string();
    }
    let caps: String = upper
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();
    if (2..=6).contains(&caps.len()) {
        caps
    } else {
        String::new()
    }
}

/// How much of `b` the normalized `a` covers when `a` sits inside `b`.
/// Asymmetric: only the a-inside-b direction counts.
pub fn containment_score(a: &str, b: &str) -> f64 {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if b.contains(&a) {
        let ratio = a.chars().count() as f64 / b.chars().count().max(1) as f64;
        return ratio.min(1.0);
    }
    0.0
}

/// Name tokens used by the generic-name check: punctuation split, stop words
/// and legal forms dropped, short tokens kept.
pub fn meaningful_name_words(raw: &str) -> Vec<String> {
    replace_non_alnum(&normalize_name(raw))
        .split_whitespace()
        .filter(|t| !is_stop_word(t) && !is_legal_entity_token(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> HashSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_normalize_name_strips_noise() {
        assert_eq!(normalize_name("PT Bank Rakyat (Persero) Tbk"), "pt bank rakyat");
        assert_eq!(normalize_name("Toko Maju & Sons"), "toko maju dan sons");
        assert_eq!(normalize_name("Bank BPD Bali Kantor Cabang Renon"), "bank bpd");
        assert_eq!(normalize_name("Dinas Pendidikan Pemkot Denpasar"), "dinas pendidikan");
        assert_eq!(normalize_name("Apotek/Kimia-Farma_Sanur"), "apotek kimia farma sanur");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_name_splits_glued_words() {
        assert_eq!(normalize_name("WarungMakan88"), "warung makan 88");
    }

    #[test]
    fn test_name_tokens_drop_generic_and_cooperative_words() {
        assert_eq!(name_tokens("Toko Maju Jaya"), set(&["maju", "jaya"]));
        assert_eq!(name_tokens("Koperasi Serba Usaha Sari Dewi"), set(&["sari", "dewi"]));
        assert_eq!(name_tokens("Warung X Denpasar"), HashSet::new());
        assert!(name_tokens("").is_empty());
    }

    #[test]
    fn test_strip_loc_words() {
        assert_eq!(strip_loc_words("Toko Maju, Jalan Gatsu Denpasar"), "toko maju gatsu");
    }

    #[test]
    fn test_acronym_of_words() {
        assert_eq!(acronym_of_words("Bank Pembangunan Daerah"), "BPD");
        assert_eq!(acronym_of_words("Toko Sinar Jaya"), "SJ");
        assert_eq!(acronym_of_words("Toko"), "");
    }

    #[test]
    fn test_abbrev_input() {
        assert_eq!(abbrev_input("bpd bali"), "BPD");
        assert_eq!(abbrev_input("Bank Rakyat"), "BANK");
        assert_eq!(abbrev_input("Perusahaan Daerah"), "");
        assert_eq!(abbrev_input(""), "");
    }

    #[test]
    fn test_containment_score() {
        assert_eq!(containment_score("Toko Maju", "toko maju"), 1.0);
        let partial = containment_score("Maju Jaya", "Toko Maju Jaya Abadi");
        assert!((partial - 9.0 / 20.0).abs() < 1e-9);
        assert_eq!(containment_score("Toko Maju Jaya Abadi", "Maju Jaya"), 0.0);
        assert_eq!(containment_score("", "Maju"), 0.0);
    }

    #[test]
    fn test_meaningful_name_words() {
        assert_eq!(meaningful_name_words("CV Sinar Jaya"), vec!["sinar", "jaya"]);
        assert_eq!(meaningful_name_words("PT Denpasar"), Vec::<String>::new());
    }
}
