// src/matching/scoring.rs - Multi-signal record/candidate scoring with adaptive weights

use crate::matching::address::{address_tokens, extract_district};
use crate::matching::classifier::is_generic_place_name;
use crate::matching::name::{abbrev_input, acronym_of_words, containment_score, name_tokens, normalize_name, strip_loc_words};
use crate::matching::similarity::{abbreviation_match, fuzzy_ratio, jaccard, soft_jaccard, soft_token_overlap};
use crate::models::core::InputRecord;
use crate::models::matching::{ScoreDiagnostics, ScoreResult};
use crate::utils::config::{EngineConfig, ScoringConfig, Weights};

/// Bonus for an overlap count from a tier table; the last tier covers
/// everything above it.
fn tier_bonus(count: usize, tiers: &[f64]) -> f64 {
    if count == 0 || tiers.is_empty() {
        return 0.0;
    }
    tiers[count.min(tiers.len()) - 1]
}

fn choose_weights(address_token_count: usize, s_name: f64, scoring: &ScoringConfig) -> (Weights, bool) {
    let address_weak = address_token_count < scoring.weak_address_min_tokens;
    let weights = if address_weak {
        scoring.weak_address_weights
    } else if s_name >= scoring.strong_name_for_weights {
        scoring.strong_name_weights
    } else {
        scoring.default_weights
    };
    (weights, address_weak)
}

fn clamp_score(score: f64, max_score: f64) -> f64 {
    score.max(0.0).min(max_score)
}

/// Scores one listing against a prepared input record.
///
/// Name similarity is the best of token Jaccard, soft Jaccard, fuzzy ratio,
/// containment and acronym match; address similarity is token Jaccard. Both
/// are weighted (address weight drops when the input address says little,
/// name weight rises when the name already convinces), then flat bonuses and
/// penalties are added and the total is clamped to `[0, max_score]`.
pub fn score_candidate(
    record: &InputRecord,
    candidate_name: &str,
    candidate_address: &str,
    is_echo: bool,
    is_generic: bool,
    config: &EngineConfig,
) -> ScoreResult {
    let scoring = &config.scoring;
    let soft_threshold = config.similarity.soft_token_threshold;

    let input_name_tokens = name_tokens(&record.name);
    let candidate_name_tokens = name_tokens(candidate_name);

    let s_name_tok = jaccard(&input_name_tokens, &candidate_name_tokens);
    let s_name_soft = soft_jaccard(&input_name_tokens, &candidate_name_tokens, soft_threshold);
    let s_name_fuzzy = fuzzy_ratio(
        &strip_loc_words(&normalize_name(&record.name)),
        &strip_loc_words(&normalize_name(candidate_name)),
    );
    let s_name_cont = containment_score(&record.name, candidate_name);
    let s_abbrev = abbreviation_match(&record.name, candidate_name);

    let s_name = [s_name_tok, s_name_soft, s_name_fuzzy, s_name_cont, s_abbrev]
        .into_iter()
        .fold(0.0, f64::max);
    let ov_name = soft_token_overlap(&input_name_tokens, &candidate_name_tokens, soft_threshold);

    let input_address_tokens = address_tokens(&record.address);
    let candidate_address_tokens = address_tokens(candidate_address);
    let s_addr = jaccard(&input_address_tokens, &candidate_address_tokens);
    let ov_addr = input_address_tokens
        .intersection(&candidate_address_tokens)
        .count();

    let address_lower = candidate_address.to_lowercase();
    let district_eff = if record.district.trim().is_empty() {
        extract_district(candidate_address)
    } else {
        record.district.clone()
    }
    .trim()
    .to_lowercase();

    let mut bonus = 0.0;
    let mut penalty = 0.0;

    if !config.city_keyword.is_empty() && address_lower.contains(&config.city_keyword.to_lowercase()) {
        bonus += scoring.city_bonus;
    }
    if !district_eff.is_empty() {
        if address_lower.contains(&district_eff) {
            bonus += scoring.district_match_bonus;
        } else {
            penalty -= scoring.district_mismatch_penalty;
        }
    }
    bonus += tier_bonus(ov_addr, &scoring.address_overlap_bonus);
    bonus += tier_bonus(ov_name, &scoring.name_overlap_bonus);

    if candidate_address.trim().is_empty() {
        penalty -= if s_name >= scoring.missing_address_strong_name {
            scoring.missing_address_penalty_strong_name
        } else {
            scoring.missing_address_penalty
        };
    }
    if is_echo {
        penalty -= scoring.echo_penalty;
    }
    if is_generic {
        penalty -= scoring.generic_penalty;
    }

    let (weights, addr_in_weak) = choose_weights(input_address_tokens.len(), s_name, scoring);
    let raw = weights.name * s_name + weights.address * s_addr + bonus + penalty;

    ScoreResult {
        score: clamp_score(raw, scoring.max_score),
        diagnostics: ScoreDiagnostics {
            s_name,
            s_name_tok,
            s_name_soft,
            s_name_fuzzy,
            s_name_cont,
            s_abbrev,
            s_addr,
            ov_addr,
            ov_name,
            district_eff,
            bonus,
            penalty,
            addr_in_weak,
            w_name: weights.name,
            w_addr: weights.address,
            abbrev_input: abbrev_input(&record.name),
            acronym_candidate: acronym_of_words(candidate_name),
            is_echo,
            is_generic,
            coords_only_boost: false,
        },
    }
}

/// Cheap ranking score for a list hit from its title and subtitle alone.
/// Returns the ranking score and the underlying full score.
pub fn quick_score_from_list(
    record: &InputRecord,
    name_hint: &str,
    sub_hint: &str,
    config: &EngineConfig,
) -> (f64, ScoreResult) {
    let result = score_candidate(
        record,
        name_hint,
        sub_hint,
        false,
        is_generic_place_name(name_hint),
        config,
    );

    let sub_lower = sub_hint.to_lowercase();
    let district = record.district.trim().to_lowercase();
    let mut bonus = 0.0;
    if !config.city_keyword.is_empty() && sub_lower.contains(&config.city_keyword.to_lowercase()) {
        bonus += config.scoring.list_city_bonus;
    }
    if !district.is_empty() && sub_lower.contains(&district) {
        bonus += config.scoring.list_district_bonus;
    }

    (clamp_score(result.score + bonus, config.scoring.max_score), result)
}

/// A listing that scored nothing but still pins a location gets a small
/// floor score so the coords-only branch can look at it.
pub fn apply_coords_only_boost(result: &mut ScoreResult, has_coordinates: bool, config: &EngineConfig) -> bool {
    if result.score <= 0.0 && has_coordinates {
        result.score = config.coords_only_boost_score;
        result.diagnostics.coords_only_boost = true;
        return true;
    }
    false
}
