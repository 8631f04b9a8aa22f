// src/resolver/query.rs - Lookup query variants for one record

use std::collections::HashSet;

use crate::matching::address::compact_address_for_query;
use crate::matching::normalize::{clean_text, collapse_whitespace};

pub const MAX_QUERIES: usize = 4;

/// Ordered lookup queries, most specific first:
/// name + address, name + district, address + name, name alone.
/// Every variant ends with the city context. Duplicates (ignoring case and
/// spacing) are dropped.
pub fn build_queries(name: &str, raw_address: &str, district: &str, city_context: &str) -> Vec<String> {
    let name = clean_text(name);
    let district = clean_text(district);
    let address = compact_address_for_query(raw_address);

    let district_part = if district.is_empty() {
        String::new()
    } else {
        format!(", {}", district)
    };

    let mut variants = Vec::with_capacity(MAX_QUERIES);
    if !name.is_empty() && !address.is_empty() {
        variants.push(format!("{}, {}{}, {}", name, address, district_part, city_context));
    }
    if !name.is_empty() {
        variants.push(format!("{}{}, {}", name, district_part, city_context));
    }
    if !name.is_empty() && !address.is_empty() {
        variants.push(format!("{}, {}{}, {}", address, name, district_part, city_context));
    }
    if !name.is_empty() {
        variants.push(format!("{}, {}", name, city_context));
    }

    let mut seen = HashSet::new();
    variants
        .into_iter()
        .map(|q| collapse_whitespace(&clean_text(&q)))
        .filter(|q| !q.is_empty())
        .filter(|q| seen.insert(q.to_lowercase()))
        .take(MAX_QUERIES)
        .collect()
}

/// Last-resort query when no variant could be built.
pub fn fallback_query(name: &str, city_context: &str) -> String {
    clean_text(&format!("{}, {}", clean_text(name), city_context))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY: &str = "Denpasar, Bali, Indonesia";

    #[test]
    fn test_full_record_builds_four_queries() {
        let queries = build_queries("Toko Maju Jaya", "Jl Imam Bonjol No 10", "Denpasar Barat", CITY);
        assert_eq!(
            queries,
            vec![
                "Toko Maju Jaya, Jalan Imam Bonjol No 10, Denpasar Barat, Denpasar, Bali, Indonesia",
                "Toko Maju Jaya, Denpasar Barat, Denpasar, Bali, Indonesia",
                "Jalan Imam Bonjol No 10, Toko Maju Jaya, Denpasar Barat, Denpasar, Bali, Indonesia",
                "Toko Maju Jaya, Denpasar, Bali, Indonesia",
            ]
        );
    }

    #[test]
    fn test_without_address_or_district_duplicates_collapse() {
        let queries = build_queries("Toko Maju Jaya", "", "", CITY);
        assert_eq!(queries, vec!["Toko Maju Jaya, Denpasar, Bali, Indonesia"]);
    }

    #[test]
    fn test_empty_name_gives_no_queries() {
        assert!(build_queries("", "Jl Imam Bonjol No 10", "Denpasar Barat", CITY).is_empty());
        assert!(build_queries("  <> ", "", "", CITY).is_empty());
    }

    #[test]
    fn test_queries_are_cleaned() {
        let queries = build_queries("Warung <Bu>   Oka", "Jl Gatot Subroto RT 02 RW 03", "", CITY);
        assert_eq!(queries[0], "Warung Bu Oka, Jalan Gatot Subroto, Denpasar, Bali, Indonesia");
        assert!(queries.iter().all(|q| !q.contains("  ") && !q.contains('<')));
    }

    #[test]
    fn test_fallback_query() {
        assert_eq!(fallback_query(" Toko  Maju ", CITY), "Toko Maju, Denpasar, Bali, Indonesia");
    }
}
