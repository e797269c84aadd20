//! Catalog loading
//!
//! One load = fetch the whole export, parse it, normalize it. A failed fetch is
//! the only error; an export with nothing usable is an ordinary
//! [`LoadOutcome::Empty`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::catalog::find_by_slug;
use super::config::AppConfig;
use super::fetcher::{fetcher_for, FetchError, TextFetcher};
use super::models::Proposal;
use super::normalizer::Normalizer;
use crate::parsers::csv_parser::{parse_with_stats, ParseStats};

/// Why a load produced nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyReason {
    NoHeaders,
    NoRecords,
    NoTitledRecords,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoHeaders => "The sheet has no header row.",
            Self::NoRecords => "The sheet has no rows.",
            Self::NoTitledRecords => "No rows in the sheet have a title.",
        }
    }
}

/// Proposals from one load
#[derive(Debug, Clone)]
pub struct Catalog {
    pub proposals: Vec<Proposal>,
    pub stats: ParseStats,
    pub loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Proposal addressed by a permalink, if any
    pub fn initial_selection(&self, slug: Option<&str>) -> Option<&Proposal> {
        let slug = slug?.trim().trim_start_matches('#');
        if slug.is_empty() {
            return None;
        }
        find_by_slug(&self.proposals, slug)
    }
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(Catalog),
    Empty(EmptyReason),
}

/// Fetches and normalizes the sheet
pub struct CatalogLoader {
    fetcher: Box<dyn TextFetcher>,
    source: String,
    normalizer: Normalizer,
}

impl CatalogLoader {
    pub fn new(fetcher: Box<dyn TextFetcher>, source: impl Into<String>, normalizer: Normalizer) -> Self {
        Self {
            fetcher,
            source: source.into(),
            normalizer,
        }
    }

    /// Build from configuration; `source_override` replaces the configured URL
    pub fn from_config(config: &AppConfig, source_override: Option<&str>) -> Result<Self, FetchError> {
        let source = source_override
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(config.source.url.as_str())
            .to_string();
        let fetcher = fetcher_for(&source, &config.fetcher_config())?;
        let normalizer = Normalizer::new()
            .with_mapping(config.field_mapping())
            .with_placeholder_image(config.display.placeholder_image.clone());

        Ok(Self::new(fetcher, source, normalizer))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fetch, parse and normalize once; no retries
    pub async fn load(&self) -> Result<LoadOutcome, FetchError> {
        let text = match self.fetcher.fetch_text(&self.source).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error fetching data from {}: {}", self.source, e);
                return Err(e);
            }
        };
        Ok(self.load_from_text(&text))
    }

    /// Parse and normalize already-fetched text
    pub fn load_from_text(&self, text: &str) -> LoadOutcome {
        let (table, stats) = parse_with_stats(text);

        if table.headers.is_empty() {
            warn!("Sheet export is empty");
            return LoadOutcome::Empty(EmptyReason::NoHeaders);
        }
        if table.records.is_empty() {
            warn!("Sheet export has headers but no rows");
            return LoadOutcome::Empty(EmptyReason::NoRecords);
        }

        let proposals = self.normalizer.normalize(&table);
        if proposals.is_empty() {
            warn!("No titled rows among {} records", table.records.len());
            return LoadOutcome::Empty(EmptyReason::NoTitledRecords);
        }

        info!(
            "Loaded {} proposals ({} rows, {} skipped)",
            proposals.len(),
            stats.total_rows,
            stats.skipped_rows
        );

        LoadOutcome::Loaded(Catalog {
            proposals,
            stats,
            loaded_at: Utc::now(),
        })
    }
}
