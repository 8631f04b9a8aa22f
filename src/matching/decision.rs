// src/matching/decision.rs - Final verdict for a record and the early-stop predicate

use crate::matching::address::address_alpha_tokens;
use crate::matching::geospatial::coordinates_in_area;
use crate::models::core::{Coordinates, DecisionBranch, InputRecord, Outcome, StatusCode};
use crate::models::matching::{BestCandidate, ScoreDiagnostics};
use crate::utils::config::{DecisionConfig, EngineConfig};

fn name_very_strong(d: &ScoreDiagnostics, decision: &DecisionConfig) -> bool {
    d.s_name >= decision.very_strong_name
        || d.s_name_cont >= decision.very_strong_containment
        || d.s_name_fuzzy >= decision.very_strong_fuzzy
}

fn name_signal_ok(d: &ScoreDiagnostics, decision: &DecisionConfig) -> bool {
    d.ov_name >= decision.signal_name_overlap
        || d.s_name_fuzzy >= decision.signal_fuzzy
        || d.s_name >= decision.signal_name
}

fn address_strong_for_generic(d: &ScoreDiagnostics, decision: &DecisionConfig) -> bool {
    d.ov_addr >= decision.generic_strong_address_overlap
        || d.s_addr >= decision.generic_strong_address_similarity
}

/// Guard for accepting a listing on its location alone. Calibrated apart
/// from the generic-name guard even where the numbers coincide.
pub fn coords_only_guard_ok(diagnostics: Option<&ScoreDiagnostics>, decision: &DecisionConfig) -> bool {
    let Some(d) = diagnostics else {
        return false;
    };
    if d.is_echo || d.is_generic {
        return false;
    }
    d.ov_name >= decision.coords_only_name_overlap
        || d.s_name >= decision.coords_only_name
        || d.s_name_fuzzy >= decision.coords_only_fuzzy
}

fn best_in_area(best: &BestCandidate, config: &EngineConfig) -> bool {
    best.coordinates
        .map_or(false, |c| coordinates_in_area(&c, &config.service_area))
}

/// The best candidate pins a place inside the area, is not an echo, and has
/// a strong name or address signal.
pub fn is_confident_in_area(best: &BestCandidate, config: &EngineConfig) -> bool {
    let Some(d) = best.diagnostics.as_ref() else {
        return false;
    };
    if !best_in_area(best, config) || d.is_echo {
        return false;
    }
    let decision = &config.decision;
    let strong_name = d.s_name >= decision.early_stop_name || d.s_name_fuzzy >= decision.early_stop_fuzzy;
    let strong_address = d.ov_addr >= decision.early_stop_address_overlap
        || d.s_addr >= decision.early_stop_address_similarity;
    strong_name || strong_address
}

/// Whether the search can stop trying further queries for this record.
pub fn should_stop_search(best: &BestCandidate, threshold: f64, config: &EngineConfig) -> bool {
    best.score >= threshold && is_confident_in_area(best, config)
}

fn outcome(
    status_code: StatusCode,
    status_label: String,
    branch: DecisionBranch,
    coordinates: Option<Coordinates>,
    closed_label: Option<String>,
) -> Outcome {
    Outcome {
        status_code,
        status_label,
        closed_label,
        coordinates: if status_code.keeps_coordinates() { coordinates } else { None },
        branch,
    }
}

fn not_found(label: String, branch: DecisionBranch) -> Outcome {
    outcome(StatusCode::NotFound, label, branch, None, None)
}

/// Applies the ordered decision policy to the best candidate of one record.
/// `record` is the prepared record the candidates were scored against.
pub fn decide(best: &BestCandidate, record: &InputRecord, config: &EngineConfig) -> Outcome {
    let decision = &config.decision;
    let d = best.diagnostics.clone().unwrap_or_default();
    let coords = best.coordinates;
    let in_area = best_in_area(best, config);
    let score = best.score;

    let accepted_by_score = score >= config.threshold_ok || name_very_strong(&d, decision);

    if let Some(c) = coords {
        if !in_area {
            return outcome(
                StatusCode::OutsideArea,
                format!(
                    "Di luar {} (lat={}, lon={})",
                    config.service_area.name, c.latitude, c.longitude
                ),
                DecisionBranch::OutsideArea,
                coords,
                None,
            );
        }
    }

    if coords.is_none() && !best.has_candidate() {
        return not_found(
            "Tidak ditemukan (tanpa_kandidat)".to_string(),
            DecisionBranch::NoCandidate,
        );
    }

    if d.is_echo && !best.has_address() {
        return not_found(
            format!("Tidak ditemukan (echo_query, score={:.2})", score),
            DecisionBranch::EchoWithoutAddress,
        );
    }

    if best.closed.is_closed && in_area && accepted_by_score {
        let closed_label = best.closed.label();
        return outcome(
            StatusCode::Closed,
            format!(
                "Tutup (score={:.2}, status={})",
                score,
                closed_label.as_deref().unwrap_or("unknown")
            ),
            DecisionBranch::Closed,
            coords,
            closed_label,
        );
    }

    if in_area && !d.is_echo && accepted_by_score {
        let signal_ok = name_signal_ok(&d, decision);

        if d.is_generic && !signal_ok && !address_strong_for_generic(&d, decision) {
            return not_found(
                format!("Tidak ditemukan (nama_generik_lemah, score={:.2})", score),
                DecisionBranch::GenericWeak,
            );
        }

        if !record.address.trim().is_empty() && best.has_address() {
            if d.s_name >= decision.exact_name || d.s_name_fuzzy >= decision.exact_name {
                return outcome(
                    StatusCode::Found,
                    format!(
                        "Ditemukan (nama sangat kuat; alamat diabaikan, score={:.2}, s_name={:.2})",
                        score, d.s_name
                    ),
                    DecisionBranch::NameVeryStrong,
                    coords,
                    None,
                );
            }

            let input_alpha = address_alpha_tokens(&record.address);
            let candidate_alpha = address_alpha_tokens(&best.address);
            let alpha_overlap = input_alpha.intersection(&candidate_alpha).count();

            let address_lock_ok = input_alpha.len() < decision.address_lock_min_alpha_tokens
                || alpha_overlap >= 1
                || d.ov_addr >= decision.address_lock_overlap
                || d.s_addr >= decision.address_lock_similarity;

            return if address_lock_ok {
                outcome(
                    StatusCode::Found,
                    format!(
                        "Ditemukan (score={:.2}, alpha_overlap={}, ov_addr={}, s_addr={:.2})",
                        score, alpha_overlap, d.ov_addr, d.s_addr
                    ),
                    DecisionBranch::AddressConfirmed,
                    coords,
                    None,
                )
            } else {
                not_found(
                    format!(
                        "Tidak ditemukan (alamat_tidak_match, score={:.2}, alpha_overlap={}, ov_addr={}, s_addr={:.2})",
                        score, alpha_overlap, d.ov_addr, d.s_addr
                    ),
                    DecisionBranch::AddressMismatch,
                )
            };
        }

        return if signal_ok {
            outcome(
                StatusCode::Found,
                format!(
                    "Ditemukan (nama+coords; alamat_gmaps_kosong, score={:.2}, ov_name={}, fuz={:.2})",
                    score, d.ov_name, d.s_name_fuzzy
                ),
                DecisionBranch::NameWithEmptyAddress,
                coords,
                None,
            )
        } else {
            not_found(
                format!("Tidak ditemukan (alamat_gmaps_kosong & nama_lemah, score={:.2})", score),
                DecisionBranch::EmptyAddressWeakName,
            )
        };
    }

    if config.allow_coords_only_match && in_area {
        return if coords_only_guard_ok(best.diagnostics.as_ref(), decision) {
            outcome(
                StatusCode::CoordsOnly,
                format!(
                    "Ditemukan (coords-only, score={:.2}, ov_name={}, fuz={:.2})",
                    score, d.ov_name, d.s_name_fuzzy
                ),
                DecisionBranch::CoordsOnly,
                coords,
                None,
            )
        } else {
            not_found(
                format!(
                    "Tidak ditemukan (coords_only_ditolak, score={:.2}, echo={}, gen={}, ov_name={}, fuz={:.2})",
                    score, d.is_echo, d.is_generic, d.ov_name, d.s_name_fuzzy
                ),
                DecisionBranch::CoordsOnlyRejected,
            )
        };
    }

    outcome(
        StatusCode::NotFound,
        format!(
            "Tidak ditemukan (score_kurang, score={:.2}, ov_addr={}, ov_name={}, s_addr={:.2})",
            score, d.ov_addr, d.ov_name, d.s_addr
        ),
        DecisionBranch::ScoreTooLow,
        None,
        best.closed.label(),
    )
}
