// src/resolver/replay.rs - Candidate source backed by recorded lookup results

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{CandidateSource, LookupResult};
use crate::matching::normalize::collapse_whitespace;

/// Key that answers every query without an entry of its own.
pub const WILDCARD_KEY: &str = "*";

/// A recorded answer: either a lookup result or the error the lookup raised.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReplayEntry {
    Failure { error: String },
    Answer(LookupResult),
}

fn query_key(query: &str) -> String {
    collapse_whitespace(query).to_lowercase()
}

/// Replays lookups from a map of query to recorded answer. Queries are
/// matched ignoring case and spacing; unknown queries fall back to the
/// wildcard entry, then to an empty page.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    entries: HashMap<String, ReplayEntry>,
    seen: Vec<String>,
}

impl ReplaySource {
    pub fn new(entries: HashMap<String, ReplayEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(query, entry)| (query_key(&query), entry))
                .collect(),
            seen: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, ReplayEntry> =
            serde_json::from_str(json).context("Failed to parse replay fixture")?;
        Ok(Self::new(entries))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay fixture {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("Invalid replay fixture {}", path.display()))
    }

    /// Queries looked up so far, in order.
    pub fn queries_seen(&self) -> &[String] {
        &self.seen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CandidateSource for ReplaySource {
    fn lookup(&mut self, query: &str) -> Result<LookupResult> {
        self.seen.push(query.to_string());
        let entry = self
            .entries
            .get(&query_key(query))
            .or_else(|| self.entries.get(WILDCARD_KEY));
        match entry {
            Some(ReplayEntry::Answer(result)) => Ok(result.clone()),
            Some(ReplayEntry::Failure { error }) => Err(anyhow!("{}", error)),
            None => Ok(LookupResult::Empty { candidate: None }),
        }
    }
}
