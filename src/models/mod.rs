pub mod core;
pub mod matching;
pub mod stats_models;

pub use self::core::{
    Candidate, ClosedStatus, ClosedType, Coordinates, DecisionBranch, InputRecord, Outcome,
    StatusCode,
};
pub use self::matching::{BestCandidate, ScoreDiagnostics, ScoreResult, NO_CANDIDATE_SCORE};
