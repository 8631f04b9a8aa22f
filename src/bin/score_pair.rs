// src/bin/score_pair.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use place_matching_lib::matching::{
    apply_coords_only_boost, decide, is_generic_place_name, looks_like_query_echo, score_candidate,
};
use place_matching_lib::models::core::{Candidate, ClosedStatus, ClosedType, InputRecord, Outcome};
use place_matching_lib::models::matching::{BestCandidate, ScoreResult};
use place_matching_lib::resolver::{build_queries, prepare_listing, DIRECT_SOURCE};
use place_matching_lib::utils::config::EngineConfig;
use place_matching_lib::utils::env::load_env;

/// Scores one business record against one listing and shows the verdict.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct ScorePairArgs {
    /// Business name of the input record
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    address: String,

    #[arg(long, default_value = "")]
    district: String,

    /// Listing title
    #[arg(long)]
    candidate_name: String,

    #[arg(long, default_value = "")]
    candidate_address: String,

    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Listing URL, used for coordinates when --lat/--lon are absent
    #[arg(long)]
    url: Option<String>,

    /// Closure type when the listing is closed: temporary, permanent or unknown
    #[arg(long)]
    closed: Option<String>,

    /// Query the listing was found with; defaults to the first generated query
    #[arg(long)]
    query: Option<String>,

    /// Engine configuration JSON
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[derive(Serialize)]
struct PairReport {
    queries: Vec<String>,
    query_used: String,
    candidate: Candidate,
    result: ScoreResult,
    outcome: Outcome,
}

fn parse_closed(value: Option<&str>) -> Result<ClosedStatus> {
    let closed_type = match value.map(|v| v.trim().to_lowercase()) {
        None => return Ok(ClosedStatus::open()),
        Some(v) if v == "temporary" => ClosedType::Temporary,
        Some(v) if v == "permanent" => ClosedType::Permanent,
        Some(v) if v == "unknown" => ClosedType::Unknown,
        Some(v) => anyhow::bail!("Unknown closure type '{}'", v),
    };
    Ok(ClosedStatus::closed(closed_type))
}

fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = ScorePairArgs::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::from_env(),
    };

    let record = InputRecord::new(&args.name, &args.address, &args.district);
    let queries = build_queries(&record.name, &record.address, &record.district, &config.city_context);
    let query_used = args
        .query
        .clone()
        .or_else(|| queries.first().cloned())
        .unwrap_or_default();

    let raw = Candidate {
        displayed_name: args.candidate_name.clone(),
        displayed_address: args.candidate_address.clone(),
        latitude: args.lat,
        longitude: args.lon,
        url: args.url.clone(),
        closed: parse_closed(args.closed.as_deref())?,
        ..Default::default()
    };
    let candidate = prepare_listing(&raw, &query_used, DIRECT_SOURCE);
    let prepared = record.prepared();

    let is_echo = looks_like_query_echo(
        &candidate.displayed_name,
        &query_used,
        &config.city_context,
        &config.similarity,
    );
    let is_generic = is_generic_place_name(&candidate.displayed_name);
    let mut result = score_candidate(
        &prepared,
        &candidate.displayed_name,
        &candidate.displayed_address,
        is_echo,
        is_generic,
        &config,
    );
    apply_coords_only_boost(&mut result, candidate.coordinates().is_some(), &config);

    let mut best = BestCandidate::new();
    best.offer(&candidate, result.clone(), DIRECT_SOURCE);
    let outcome = decide(&best, &prepared, &config);
    info!("kode={} | {}", outcome.status_code, outcome.status_label);

    let report = PairReport {
        queries,
        query_used,
        candidate,
        result,
        outcome,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize pair report")?;
    println!("{}", json);
    Ok(())
}
