// src/models/matching.rs - Score results and the per-record best-candidate accumulator

use serde::{Deserialize, Serialize};

use crate::models::core::{Candidate, ClosedStatus, Coordinates};

/// Every sub-score and flag that went into a candidate score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDiagnostics {
    /// Best of the name metrics below.
    pub s_name: f64,
    pub s_name_tok: f64,
    pub s_name_soft: f64,
    pub s_name_fuzzy: f64,
    pub s_name_cont: f64,
    pub s_abbrev: f64,
    pub s_addr: f64,
    pub ov_addr: usize,
    /// Soft name-token overlap count.
    pub ov_name: usize,
    /// Lower-cased district used for the district bonus; empty when none resolved.
    pub district_eff: String,
    pub bonus: f64,
    /// Sum of penalties, zero or negative.
    pub penalty: f64,
    pub addr_in_weak: bool,
    pub w_name: f64,
    pub w_addr: f64,
    pub abbrev_input: String,
    pub acronym_candidate: String,
    pub is_echo: bool,
    pub is_generic: bool,
    pub coords_only_boost: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Always within [0.0, max_score].
    pub score: f64,
    pub diagnostics: ScoreDiagnostics,
}

/// Score of a `BestCandidate` that has not seen any candidate yet.
pub const NO_CANDIDATE_SCORE: f64 = -1.0;

/// Highest-scoring candidate seen so far while resolving one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestCandidate {
    pub score: f64,
    pub diagnostics: Option<ScoreDiagnostics>,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub closed: ClosedStatus,
    pub source: Option<String>,
}

impl Default for BestCandidate {
    fn default() -> Self {
        Self::new()
    }
}

impl BestCandidate {
    pub fn new() -> Self {
        Self {
            score: NO_CANDIDATE_SCORE,
            diagnostics: None,
            name: String::new(),
            address: String::new(),
            phone: None,
            coordinates: None,
            closed: ClosedStatus::open(),
            source: None,
        }
    }

    pub fn has_candidate(&self) -> bool {
        self.score >= 0.0
    }

    pub fn is_echo(&self) -> bool {
        self.diagnostics.as_ref().map_or(false, |d| d.is_echo)
    }

    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }

    /// Takes `candidate` if it carries anything usable and strictly beats the
    /// current best. Ties keep the earlier candidate. Returns whether it was taken.
    pub fn offer(&mut self, candidate: &Candidate, result: ScoreResult, source: &str) -> bool {
        if candidate.is_null() || result.score <= self.score {
            return false;
        }
        self.score = result.score;
        self.diagnostics = Some(result.diagnostics);
        self.name = candidate.displayed_name.clone();
        self.address = candidate.displayed_address.clone();
        self.phone = candidate.phone.clone();
        self.coordinates = candidate.coordinates();
        self.closed = candidate.closed;
        self.source = Some(source.to_string());
        true
    }
}
