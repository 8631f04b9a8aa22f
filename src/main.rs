use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use place_matching_lib::matching::normalize::sanitize_cell;
use place_matching_lib::models::core::{Coordinates, InputRecord};
use place_matching_lib::models::stats_models::RunSummary;
use place_matching_lib::resolver::replay::ReplayEntry;
use place_matching_lib::resolver::{Disposition, OutputRow, ReplaySource, Resolution, Resolver};
use place_matching_lib::utils::config::EngineConfig;
use place_matching_lib::utils::env::load_env;
use place_matching_lib::utils::progress_bars::logging::ResolverLogger;
use place_matching_lib::utils::progress_bars::progress_config::ProgressConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of records to resolve
    #[arg(long)]
    input: PathBuf,

    /// Output file, one JSON row per record
    #[arg(long)]
    output: PathBuf,

    /// Engine configuration JSON; defaults plus environment overrides when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay fixture for records without their own recorded lookups
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Write the run summary as JSON here
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// One input row. Column names of the source sheet are accepted as aliases.
#[derive(Debug, Deserialize)]
struct BatchRecord {
    #[serde(default, alias = "nama_usaha")]
    name: Option<String>,
    #[serde(default, alias = "alamat_usaha")]
    address: Option<String>,
    #[serde(default, alias = "nmkec")]
    district: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    /// Recorded lookups for this record, keyed by query.
    #[serde(default)]
    lookups: Option<HashMap<String, ReplayEntry>>,
}

impl BatchRecord {
    fn input_record(&self) -> InputRecord {
        InputRecord::new(
            sanitize_cell(self.name.as_deref()),
            sanitize_cell(self.address.as_deref()),
            sanitize_cell(self.district.as_deref()),
        )
    }

    fn existing_coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

fn read_batch(path: &Path) -> Result<Vec<BatchRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse input {}", path.display()))
}

fn tally(summary: &mut RunSummary, resolution: &Resolution) {
    summary.record_status(resolution.outcome.status_code.code());
    summary.lookups_failed += resolution.lookups_failed;
    match resolution.disposition {
        Disposition::Skipped => summary.records_skipped += 1,
        Disposition::Prefilled => summary.records_prefilled += 1,
        Disposition::Failed => summary.records_failed += 1,
        Disposition::Resolved => {}
    }
}

fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::from_env(),
    };
    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, refresh={}ms",
        progress_config.enabled, progress_config.refresh_rate_ms
    );

    let records = read_batch(&args.input)?;
    let logger = ResolverLogger::new();
    let mut shared_source = match &args.replay {
        Some(path) => {
            let source = ReplaySource::from_json_file(path)?;
            if source.is_empty() {
                logger.log_warning(&format!("Replay fixture {} has no entries", path.display()));
            } else {
                info!("Loaded {} recorded lookups from {}", source.len(), path.display());
            }
            source
        }
        None => ReplaySource::default(),
    };

    let mut summary = RunSummary::new();
    logger.log_start(
        &summary.run_id,
        records.len(),
        config.threshold_ok,
        config.threshold_early_stop,
    );
    if records.is_empty() {
        logger.log_warning(&format!("No records in {}", args.input.display()));
    }
    let resolver = Resolver::with_logger(config, logger.clone());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create output {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);

    logger.log_phase("Resolving records", Some(&format!("{} rows", records.len())));
    let pb = progress_config.create_progress_bar(records.len() as u64);

    for (idx, batch_record) in records.into_iter().enumerate() {
        let record = batch_record.input_record();
        let existing = batch_record.existing_coordinates();

        let resolution = match batch_record.lookups {
            Some(entries) => {
                let mut source = ReplaySource::new(entries);
                resolver.resolve(&record, existing, &mut source)
            }
            None => resolver.resolve(&record, existing, &mut shared_source),
        };
        logger.log_verdict(
            idx,
            resolution.score,
            resolution.source.as_deref(),
            &resolution.outcome,
        );
        tally(&mut summary, &resolution);

        let row = OutputRow::from_resolution(&record, &resolution);
        serde_json::to_writer(&mut writer, &row)
            .with_context(|| format!("Failed to write output row {}", idx))?;
        writeln!(writer).context("Failed to write output")?;

        pb.inc(1);
        pb.set_message(format!("kode {}", resolution.outcome.status_code));
    }

    writer.flush().context("Failed to flush output")?;
    if args.replay.is_some() {
        debug!(
            "Shared replay fixture answered {} queries",
            shared_source.queries_seen().len()
        );
    }
    pb.finish_with_message("done");

    summary.finish();
    logger.log_completion(&summary);

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run summary {}", path.display()))?;
        info!("Run summary written to {}", path.display());
    }

    info!(
        "Wrote {} rows to {} in {:.2}s",
        summary.records_total,
        args.output.display(),
        summary.elapsed_secs()
    );
    Ok(())
}
