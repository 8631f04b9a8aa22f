// src/resolver/mod.rs - Drives lookups for one record and turns the best listing into a verdict
pub mod output;
pub mod query;
pub mod replay;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::matching::address::clean_listing_address;
use crate::matching::closed::detect_closed_status;
use crate::matching::normalize::clean_text;
use crate::matching::{
    apply_coords_only_boost, decide, is_confident_in_area, is_generic_place_name,
    looks_like_query_echo, parse_coords_from_url, quick_score_from_list, score_candidate,
    should_stop_search,
};
use crate::models::core::{Candidate, Coordinates, DecisionBranch, InputRecord, Outcome, StatusCode};
use crate::models::matching::BestCandidate;
use crate::utils::config::EngineConfig;
use crate::utils::constants::is_placeholder_title;
use crate::utils::progress_bars::logging::ResolverLogger;

pub use output::OutputRow;
pub use query::{build_queries, fallback_query};
pub use replay::ReplaySource;

pub const DIRECT_SOURCE: &str = "direct/place";
pub const EMPTY_SOURCE: &str = "fallback/empty";
/// List mode always ranks at least this many hits.
pub const MIN_LIST_CANDIDATES: usize = 8;

pub const SKIP_REMARK: &str = "Skip: nama_usaha kosong";
pub const FAILED_LABEL: &str = "Gagal diproses";

/// Anything that can answer a lookup query with listings: a live maps
/// client, a recorded fixture, a test stub.
pub trait CandidateSource {
    fn lookup(&mut self, query: &str) -> Result<LookupResult>;
}

/// What one lookup query produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupResult {
    /// The query landed straight on a place page.
    DirectPlace { candidate: Candidate },
    /// A result list; hits carry only hints until opened.
    List {
        #[serde(default)]
        hits: Vec<ListHit>,
    },
    /// Neither a place nor a list; whatever the page showed, if anything.
    Empty {
        #[serde(default)]
        candidate: Option<Candidate>,
    },
}

/// One entry of a result list. `candidate` is the opened detail page;
/// hits without one cannot be opened and are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListHit {
    pub name_hint: String,
    pub sub_hint: String,
    pub candidate: Option<Candidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Looked up and decided.
    Resolved,
    /// No usable name.
    Skipped,
    /// Coordinates were already known.
    Prefilled,
    /// Every lookup failed.
    Failed,
}

/// Final result for one record, ready to be written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub disposition: Disposition,
    pub outcome: Outcome,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    /// Best score rounded to 4 decimals; absent when no listing was seen.
    pub score: Option<f64>,
    pub source: Option<String>,
    pub remark: Option<String>,
    pub queries_tried: usize,
    pub lookups_failed: usize,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl Resolution {
    fn empty(disposition: Disposition, outcome: Outcome) -> Self {
        Self {
            disposition,
            outcome,
            name: String::new(),
            address: String::new(),
            phone: None,
            score: None,
            source: None,
            remark: None,
            queries_tried: 0,
            lookups_failed: 0,
        }
    }

    pub fn skipped() -> Self {
        let mut resolution = Self::empty(
            Disposition::Skipped,
            Outcome {
                status_code: StatusCode::NotFound,
                status_label: "Tidak ditemukan".to_string(),
                closed_label: None,
                coordinates: None,
                branch: DecisionBranch::Skipped,
            },
        );
        resolution.remark = Some(SKIP_REMARK.to_string());
        resolution
    }

    pub fn prefilled(coordinates: Coordinates) -> Self {
        Self::empty(
            Disposition::Prefilled,
            Outcome {
                status_code: StatusCode::Found,
                status_label: String::new(),
                closed_label: None,
                coordinates: Some(coordinates),
                branch: DecisionBranch::ExistingCoordinates,
            },
        )
    }

    pub fn failed(error: &anyhow::Error, queries_tried: usize) -> Self {
        let mut resolution = Self::empty(
            Disposition::Failed,
            Outcome {
                status_code: StatusCode::NotFound,
                status_label: FAILED_LABEL.to_string(),
                closed_label: None,
                coordinates: None,
                branch: DecisionBranch::LookupFailed,
            },
        );
        resolution.remark = Some(format!("{}: {:#}", FAILED_LABEL, error));
        resolution.queries_tried = queries_tried;
        resolution.lookups_failed = queries_tried;
        resolution
    }

    fn decided(outcome: Outcome, best: &BestCandidate, queries_tried: usize, lookups_failed: usize) -> Self {
        Self {
            disposition: Disposition::Resolved,
            outcome,
            name: best.name.clone(),
            address: best.address.clone(),
            phone: best.phone.clone(),
            score: best.has_candidate().then(|| round4(best.score)),
            source: best.source.clone(),
            remark: None,
            queries_tried,
            lookups_failed,
        }
    }
}

/// Normalizes a listing as scraped: placeholder titles become empty,
/// address labels and Plus Codes go away, coordinates fall back to the URL
/// and closure notices are read from the panel text.
pub fn prepare_listing(raw: &Candidate, query: &str, source_tag: &str) -> Candidate {
    let mut candidate = raw.clone();

    let name = candidate.displayed_name.trim();
    candidate.displayed_name = if is_placeholder_title(name) {
        String::new()
    } else {
        name.to_string()
    };
    candidate.displayed_address = clean_listing_address(&candidate.displayed_address);
    candidate.phone = candidate
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let coordinates = candidate
        .coordinates()
        .or_else(|| candidate.url.as_deref().and_then(parse_coords_from_url));
    candidate.latitude = coordinates.map(|c| c.latitude);
    candidate.longitude = coordinates.map(|c| c.longitude);

    if !candidate.closed.is_closed {
        if let Some(panel) = candidate.panel_text.as_deref() {
            candidate.closed = detect_closed_status(panel);
        }
    }

    candidate.query_used = query.to_string();
    candidate.source_tag = source_tag.to_string();
    candidate
}

pub struct Resolver {
    config: EngineConfig,
    logger: ResolverLogger,
}

impl Resolver {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            logger: ResolverLogger::new(),
        }
    }

    pub fn with_logger(config: EngineConfig, logger: ResolverLogger) -> Self {
        Self { config, logger }
    }

    /// Resolves one raw record. `existing` short-circuits the lookup when the
    /// record already carries coordinates.
    pub fn resolve<S: CandidateSource + ?Sized>(
        &self,
        record: &InputRecord,
        existing: Option<Coordinates>,
        source: &mut S,
    ) -> Resolution {
        if clean_text(&record.name).is_empty() {
            return Resolution::skipped();
        }
        if let Some(coordinates) = existing {
            return Resolution::prefilled(coordinates);
        }

        let prepared = record.prepared();
        let mut queries = build_queries(
            &record.name,
            &record.address,
            &record.district,
            &self.config.city_context,
        );
        queries.truncate(self.config.max_queries.max(1));
        if queries.is_empty() {
            queries.push(fallback_query(&record.name, &self.config.city_context));
        }
        self.logger.log_record_start(&prepared.name, queries.len());

        let mut best = BestCandidate::new();
        let mut queries_tried = 0;
        let mut lookups_failed = 0;
        let mut last_error = None;

        for query in &queries {
            queries_tried += 1;
            self.logger.log_query(query);

            let lookup = match source.lookup(query) {
                Ok(lookup) => lookup,
                Err(e) => {
                    self.logger.log_lookup_failed(query, &e);
                    lookups_failed += 1;
                    last_error = Some(e);
                    continue;
                }
            };

            let stop = match lookup {
                LookupResult::DirectPlace { candidate } => {
                    self.consider(&prepared, &candidate, query, DIRECT_SOURCE, &mut best);
                    should_stop_search(&best, self.config.threshold_early_stop, &self.config)
                }
                LookupResult::List { hits } => self.scan_list(&prepared, hits, query, &mut best),
                LookupResult::Empty { candidate } => match candidate {
                    Some(candidate) => {
                        self.consider(&prepared, &candidate, query, EMPTY_SOURCE, &mut best)
                            && self.confident_enough(&best)
                    }
                    None => false,
                },
            };

            if stop {
                self.logger.log_early_stop(best.score);
                break;
            }
        }

        if lookups_failed == queries_tried {
            if let Some(error) = last_error {
                return Resolution::failed(&error, queries_tried);
            }
        }

        let outcome = decide(&best, &prepared, &self.config);
        Resolution::decided(outcome, &best, queries_tried, lookups_failed)
    }

    fn confident_enough(&self, best: &BestCandidate) -> bool {
        best.score >= self.config.threshold_early_stop || is_confident_in_area(best, &self.config)
    }

    /// Scores one listing and offers it to the accumulator.
    fn consider(
        &self,
        record: &InputRecord,
        raw: &Candidate,
        query: &str,
        source_tag: &str,
        best: &mut BestCandidate,
    ) -> bool {
        let config = &self.config;
        let candidate = prepare_listing(raw, query, source_tag);

        let is_echo = looks_like_query_echo(
            &candidate.displayed_name,
            query,
            &config.city_context,
            &config.similarity,
        );
        let is_generic = is_generic_place_name(&candidate.displayed_name);
        let mut result = score_candidate(
            record,
            &candidate.displayed_name,
            &candidate.displayed_address,
            is_echo,
            is_generic,
            config,
        );
        let coordinates = candidate.coordinates();
        apply_coords_only_boost(&mut result, coordinates.is_some(), config);

        self.logger.log_candidate(
            source_tag,
            &result,
            coordinates,
            &candidate.displayed_name,
            &candidate.displayed_address,
        );
        best.offer(&candidate, result, source_tag)
    }

    /// Ranks list hits by their hints, opens the top ones and reports whether
    /// the query loop can stop.
    fn scan_list(&self, record: &InputRecord, hits: Vec<ListHit>, query: &str, best: &mut BestCandidate) -> bool {
        let config = &self.config;
        let limit = config.max_candidates.max(MIN_LIST_CANDIDATES);

        let mut ranked: Vec<(f64, ListHit)> = hits
            .into_iter()
            .take(limit)
            .map(|hit| {
                let (quick, _) = quick_score_from_list(record, &hit.name_hint, &hit.sub_hint, config);
                (quick, hit)
            })
            .collect();
        // sort_by is stable: equal quick scores keep list order
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let to_open = ranked.len().min(config.top_open);
        self.logger.log_list_ranking(ranked.len(), to_open);

        for (rank, (quick, hit)) in ranked.into_iter().take(to_open).enumerate() {
            let Some(candidate) = hit.candidate else {
                continue;
            };
            let source_tag = format!("listTop#{}", rank + 1);
            self.logger
                .log_debug(&format!("opening {} (pre={:.2}) {}", source_tag, quick, hit.name_hint));
            self.consider(record, &candidate, query, &source_tag, best);
            if self.confident_enough(best) {
                break;
            }
        }

        should_stop_search(best, config.threshold_early_stop, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::{ClosedStatus, ClosedType};
    use anyhow::anyhow;
    use std::collections::VecDeque;

    /// Answers queries from a queue; an exhausted queue answers empty.
    struct ScriptedSource {
        answers: VecDeque<Result<LookupResult>>,
        queries: Vec<String>,
    }

    impl ScriptedSource {
        fn new(answers: Vec<Result<LookupResult>>) -> Self {
            Self {
                answers: answers.into(),
                queries: Vec::new(),
            }
        }
    }

    impl CandidateSource for ScriptedSource {
        fn lookup(&mut self, query: &str) -> Result<LookupResult> {
            self.queries.push(query.to_string());
            self.answers
                .pop_front()
                .unwrap_or(Ok(LookupResult::Empty { candidate: None }))
        }
    }

    fn record() -> InputRecord {
        InputRecord::new("Toko Maju Jaya", "Jl Imam Bonjol No 10", "Denpasar Barat")
    }

    fn listing(name: &str, address: &str, lat: f64, lon: f64) -> Candidate {
        Candidate {
            displayed_name: name.to_string(),
            displayed_address: address.to_string(),
            phone: Some("0361 123456".to_string()),
            latitude: Some(lat),
            longitude: Some(lon),
            ..Default::default()
        }
    }

    fn exact_listing() -> Candidate {
        listing("Toko Maju Jaya", "Jl. Imam Bonjol No. 10, Denpasar Barat", -8.65, 115.21)
    }

    #[test]
    fn test_empty_name_is_skipped_without_lookup() {
        let resolver = Resolver::new(EngineConfig::default());
        let mut source = ScriptedSource::new(vec![]);
        let resolution = resolver.resolve(&InputRecord::new(" <> ", "Jl Imam Bonjol", ""), None, &mut source);

        assert_eq!(resolution.disposition, Disposition::Skipped);
        assert_eq!(resolution.outcome.status_code, StatusCode::NotFound);
        assert_eq!(resolution.outcome.status_label, "Tidak ditemukan");
        assert_eq!(resolution.remark.as_deref(), Some(SKIP_REMARK));
        assert!(source.queries.is_empty());
    }

    #[test]
    fn test_existing_coordinates_pass_through() {
        let resolver = Resolver::new(EngineConfig::default());
        let mut source = ScriptedSource::new(vec![]);
        let coords = Coordinates::new(-8.6, 115.2);
        let resolution = resolver.resolve(&record(), Some(coords), &mut source);

        assert_eq!(resolution.disposition, Disposition::Prefilled);
        assert_eq!(resolution.outcome.status_code, StatusCode::Found);
        assert_eq!(resolution.outcome.coordinates, Some(coords));
        assert!(source.queries.is_empty());
    }

    #[test]
    fn test_direct_match_stops_after_first_query() {
        let resolver = Resolver::new(EngineConfig::default());
        let mut source = ScriptedSource::new(vec![Ok(LookupResult::DirectPlace {
            candidate: exact_listing(),
        })]);
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_eq!(source.queries.len(), 1);
        assert_eq!(
            source.queries[0],
            "Toko Maju Jaya, Jalan Imam Bonjol No 10, Denpasar Barat, Denpasar, Bali, Indonesia"
        );
        assert_eq!(resolution.disposition, Disposition::Resolved);
        assert_eq!(resolution.outcome.status_code, StatusCode::Found);
        assert_eq!(resolution.outcome.coordinates, Some(Coordinates::new(-8.65, 115.21)));
        assert_eq!(resolution.source.as_deref(), Some(DIRECT_SOURCE));
        assert_eq!(resolution.phone.as_deref(), Some("0361 123456"));
        assert_eq!(resolution.score, Some(1.04));
    }

    #[test]
    fn test_list_hits_are_ranked_before_opening() {
        let resolver = Resolver::new(EngineConfig::default());
        let hits = vec![
            ListHit {
                name_hint: "Bengkel Sinar Motor".to_string(),
                sub_hint: "Jl. Gatot Subroto".to_string(),
                candidate: Some(listing("Bengkel Sinar Motor", "Jl. Gatot Subroto No. 5", -8.63, 115.2)),
            },
            ListHit {
                name_hint: "Toko Maju Jaya Cabang".to_string(),
                sub_hint: String::new(),
                candidate: None,
            },
            ListHit {
                name_hint: "Toko Maju Jaya".to_string(),
                sub_hint: "Jl. Imam Bonjol No. 10, Denpasar Barat".to_string(),
                candidate: Some(exact_listing()),
            },
        ];
        let mut source = ScriptedSource::new(vec![Ok(LookupResult::List { hits })]);
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_eq!(source.queries.len(), 1);
        assert_eq!(resolution.source.as_deref(), Some("listTop#1"));
        assert_eq!(resolution.name, "Toko Maju Jaya");
        assert_eq!(resolution.outcome.status_code, StatusCode::Found);
    }

    #[test]
    fn test_list_stops_opening_once_confident() {
        let resolver = Resolver::new(EngineConfig::default());
        // would outscore the first listing if it were ever opened
        let mut better = exact_listing();
        better.phone = Some("0361 999999".to_string());
        let hits = vec![
            ListHit {
                name_hint: "Toko Maju Jaya".to_string(),
                sub_hint: "Jl. Imam Bonjol No. 10, Denpasar Barat".to_string(),
                candidate: Some(listing("Toko Maju Jaya", "", -8.65, 115.21)),
            },
            ListHit {
                name_hint: "Bengkel Sinar Motor".to_string(),
                sub_hint: "Jl. Gatot Subroto".to_string(),
                candidate: Some(better),
            },
        ];
        let mut source = ScriptedSource::new(vec![Ok(LookupResult::List { hits })]);
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_eq!(resolution.source.as_deref(), Some("listTop#1"));
        assert_eq!(resolution.address, "");
        assert_eq!(resolution.phone.as_deref(), Some("0361 123456"));
        assert!(resolution.score.map_or(false, |s| s < 1.0));
        assert_eq!(resolution.outcome.branch, DecisionBranch::NameWithEmptyAddress);
    }

    #[test]
    fn test_list_opens_at_most_top_open_hits() {
        let config = EngineConfig {
            top_open: 2,
            ..EngineConfig::default()
        };
        let resolver = Resolver::new(config);
        let hits = vec![
            ListHit {
                name_hint: "Warung Lain".to_string(),
                sub_hint: String::new(),
                candidate: Some(exact_listing()),
            },
            ListHit {
                name_hint: "Toko Maju Jaya".to_string(),
                sub_hint: "Jl. Imam Bonjol No. 10, Denpasar Barat".to_string(),
                candidate: Some(listing("Bengkel Sinar Motor", "", -8.65, 115.21)),
            },
            ListHit {
                name_hint: "Toko Maju Jaya Cabang".to_string(),
                sub_hint: "Denpasar Barat".to_string(),
                candidate: Some(listing("Bengkel Las Sentosa", "", -8.66, 115.22)),
            },
        ];
        let mut source = ScriptedSource::new(vec![Ok(LookupResult::List { hits })]);
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_ne!(resolution.source.as_deref(), Some("listTop#3"));
        assert_ne!(resolution.name, "Toko Maju Jaya");
        assert_ne!(resolution.outcome.status_code, StatusCode::Found);
        assert_eq!(source.queries.len(), 4);
    }

    #[test]
    fn test_all_lookups_failing_marks_record_failed() {
        let resolver = Resolver::new(EngineConfig::default());
        let mut source = ScriptedSource::new(
            (0..4).map(|_| Err(anyhow!("timeout waiting for results"))).collect(),
        );
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_eq!(source.queries.len(), 4);
        assert_eq!(resolution.disposition, Disposition::Failed);
        assert_eq!(resolution.outcome.status_code, StatusCode::NotFound);
        assert_eq!(resolution.outcome.status_label, FAILED_LABEL);
        assert_eq!(
            resolution.remark.as_deref(),
            Some("Gagal diproses: timeout waiting for results")
        );
        assert_eq!(resolution.lookups_failed, 4);
    }

    #[test]
    fn test_failed_lookup_is_skipped() {
        let resolver = Resolver::new(EngineConfig::default());
        let mut source = ScriptedSource::new(vec![
            Err(anyhow!("connection reset")),
            Ok(LookupResult::DirectPlace {
                candidate: exact_listing(),
            }),
        ]);
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_eq!(resolution.disposition, Disposition::Resolved);
        assert_eq!(resolution.outcome.status_code, StatusCode::Found);
        assert_eq!(resolution.queries_tried, 2);
        assert_eq!(resolution.lookups_failed, 1);
    }

    #[test]
    fn test_no_listing_anywhere() {
        let resolver = Resolver::new(EngineConfig::default());
        let mut source = ScriptedSource::new(vec![]);
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_eq!(source.queries.len(), 4);
        assert_eq!(resolution.outcome.status_label, "Tidak ditemukan (tanpa_kandidat)");
        assert_eq!(resolution.score, None);
        assert_eq!(resolution.source, None);
    }

    #[test]
    fn test_empty_page_candidate_is_scored() {
        let resolver = Resolver::new(EngineConfig::default());
        let mut source = ScriptedSource::new(vec![Ok(LookupResult::Empty {
            candidate: Some(exact_listing()),
        })]);
        let resolution = resolver.resolve(&record(), None, &mut source);

        assert_eq!(source.queries.len(), 1);
        assert_eq!(resolution.source.as_deref(), Some(EMPTY_SOURCE));
        assert_eq!(resolution.outcome.status_code, StatusCode::Found);
    }

    #[test]
    fn test_prepare_listing() {
        let raw = Candidate {
            displayed_name: " Hasil ".to_string(),
            displayed_address: "Alamat: Jl. Imam Bonjol No. 10 7QJ2+XG".to_string(),
            phone: Some("  ".to_string()),
            latitude: Some(-8.6),
            url: Some("https://www.google.com/maps/place/x/data=!3d-8.6543!4d115.2101".to_string()),
            panel_text: Some("Tutup sementara".to_string()),
            ..Default::default()
        };
        let candidate = prepare_listing(&raw, "q", "listTop#2");

        assert_eq!(candidate.displayed_name, "");
        assert_eq!(candidate.displayed_address, "Jl. Imam Bonjol No. 10");
        assert_eq!(candidate.phone, None);
        assert_eq!(candidate.coordinates(), Some(Coordinates::new(-8.6543, 115.2101)));
        assert_eq!(candidate.closed, ClosedStatus::closed(ClosedType::Temporary));
        assert_eq!(candidate.query_used, "q");
        assert_eq!(candidate.source_tag, "listTop#2");
    }

    #[test]
    fn test_prepare_listing_keeps_both_or_neither_coordinate() {
        let raw = Candidate {
            displayed_name: "Toko".to_string(),
            latitude: Some(-8.6),
            ..Default::default()
        };
        let candidate = prepare_listing(&raw, "q", DIRECT_SOURCE);
        assert_eq!(candidate.latitude, None);
        assert_eq!(candidate.longitude, None);
    }

    #[test]
    fn test_lookup_result_json_shape() {
        let lookup: LookupResult = serde_json::from_str(
            r#"{"kind": "list", "hits": [{"name_hint": "Toko Maju Jaya", "candidate": {"displayed_name": "Toko Maju Jaya"}}]}"#,
        )
        .unwrap();
        match lookup {
            LookupResult::List { hits } => {
                assert_eq!(hits.len(), 1);
                assert_eq!(hits[0].sub_hint, "");
                assert!(hits[0].candidate.is_some());
            }
            other => panic!("unexpected lookup result: {:?}", other),
        }
        let empty: LookupResult = serde_json::from_str(r#"{"kind": "empty"}"#).unwrap();
        assert_eq!(empty, LookupResult::Empty { candidate: None });
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.04), 1.04);
    }
}
