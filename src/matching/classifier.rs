// src/matching/classifier.rs - Echo and generic-name flags for listing candidates

use crate::matching::name::{is_common_suffix, is_generic_word, meaningful_name_words, normalize_name};
use crate::matching::similarity::fuzzy_ratio;
use crate::utils::config::SimilarityConfig;
use crate::utils::constants::is_placeholder_title;

/// True when the listing name merely restates the lookup query, e.g. a
/// "name, address, Denpasar, Bali, Indonesia" title built by the source
/// itself instead of a real place name.
pub fn looks_like_query_echo(
    candidate_name: &str,
    query_used: &str,
    city_context: &str,
    config: &SimilarityConfig,
) -> bool {
    let name = candidate_name.trim().to_lowercase();
    let query = query_used.trim().to_lowercase();
    let context = city_context.trim().to_lowercase();
    if name.is_empty() || query.is_empty() {
        return false;
    }

    let similarity = fuzzy_ratio(&name, &query);

    if !context.is_empty()
        && name.contains(&context)
        && name.matches(',').count() >= config.echo_min_commas
    {
        if similarity >= config.echo_fuzzy_with_context {
            return true;
        }
        let query_chars = query.chars().count();
        let prefix_len = config
            .echo_prefix_min_chars
            .max((query_chars as f64 * config.echo_prefix_fraction) as usize);
        let prefix: String = query.chars().take(prefix_len).collect();
        if name.contains(&prefix) {
            return true;
        }
    }

    similarity >= config.echo_fuzzy_alone
}

/// A name that identifies nothing on its own: empty, a single meaningful
/// word, a word plus a common suffix ("Sinar Jaya"), or mostly business-type
/// and suffix words ("Toko Kue Jaya").
pub fn is_too_generic_name(name: &str) -> bool {
    if normalize_name(name).is_empty() {
        return true;
    }
    let words = meaningful_name_words(name);
    if words.len() <= 1 {
        return true;
    }
    if words.len() == 2 && words.iter().any(|w| is_common_suffix(w)) {
        return true;
    }
    let generic_hits = words
        .iter()
        .filter(|w| is_generic_word(w) || is_common_suffix(w))
        .count();
    generic_hits >= (words.len() - 1).max(1)
}

/// Listing-name variant of `is_too_generic_name` that also catches
/// placeholder titles and boilerplate room-rental listings.
pub fn is_generic_place_name(candidate_name: &str) -> bool {
    let lowered = candidate_name.trim().to_lowercase();
    if lowered.is_empty() || is_placeholder_title(&lowered) {
        return true;
    }
    if lowered.contains("sewa")
        && (lowered.contains("kos") || lowered.contains("kost"))
        && lowered.contains("denpasar")
    {
        return true;
    }
    is_too_generic_name(candidate_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::DEFAULT_CITY_CONTEXT;

    fn similarity() -> SimilarityConfig {
        SimilarityConfig::default()
    }

    #[test]
    fn test_verbatim_query_is_echo() {
        let query = "Toko Maju Jaya, Jalan Imam Bonjol No 10, Denpasar Barat, Denpasar, Bali, Indonesia";
        assert!(looks_like_query_echo(query, query, DEFAULT_CITY_CONTEXT, &similarity()));
    }

    #[test]
    fn test_query_restated_with_city_context_is_echo() {
        let query = "Warung Sari Rasa Gatot Subroto Barat, Denpasar, Bali, Indonesia";
        let title = "Warung Sari Rasa Gatot, Denpasar, Bali, Indonesia";
        assert!(looks_like_query_echo(title, query, DEFAULT_CITY_CONTEXT, &similarity()));
    }

    #[test]
    fn test_query_prefix_inside_context_title_is_echo() {
        let query = "Toko Maju Jaya, Jalan Imam Bonjol No 10, Denpasar Barat, Denpasar, Bali, Indonesia";
        let title = "Toko Maju Jaya, Jalan Imam Bonjol No 10, Denpasar Kreneng, sebelah Gereja \
                     Katedral lama dan Pasar Seni Kumbasari, Kota Denpasar, Bali, Indonesia";
        // too different overall, but the leading part of the query is there verbatim
        assert!(fuzzy_ratio(title, query) < similarity().echo_fuzzy_with_context);
        assert!(looks_like_query_echo(title, query, DEFAULT_CITY_CONTEXT, &similarity()));
    }

    #[test]
    fn test_real_place_name_is_not_echo() {
        let query = "Toko Maju Jaya, Denpasar, Bali, Indonesia";
        assert!(!looks_like_query_echo("Toko Maju Jaya", query, DEFAULT_CITY_CONTEXT, &similarity()));
        assert!(!looks_like_query_echo("", query, DEFAULT_CITY_CONTEXT, &similarity()));
        assert!(!looks_like_query_echo("Toko Maju Jaya", "", DEFAULT_CITY_CONTEXT, &similarity()));
    }

    #[test]
    fn test_is_too_generic_name() {
        assert!(is_too_generic_name(""));
        assert!(is_too_generic_name("Toko"));
        assert!(is_too_generic_name("PT Sinar"));
        assert!(is_too_generic_name("Sinar Jaya"));
        assert!(is_too_generic_name("Toko Maju Jaya"));
        assert!(is_too_generic_name("Warung Kopi"));
        assert!(!is_too_generic_name("Warung Makan Bu Oka"));
        assert!(!is_too_generic_name("Apotek Kimia Farma Sanur"));
    }

    #[test]
    fn test_is_generic_place_name() {
        assert!(is_generic_place_name("Hasil"));
        assert!(is_generic_place_name("  results "));
        assert!(is_generic_place_name("Sewa Kost Murah Denpasar Sanur"));
        assert!(!is_generic_place_name("Bank Pembangunan Daerah Bali"));
    }
}
