//! Core data models for the proposal catalog

use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

/// Title shown for a proposal whose title cell is blank
pub const UNTITLED_PROPOSAL: &str = "Untitled Proposal";

/// Image used when a proposal has no cover image
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.svg";

/// One row of the sheet keyed by column name

pub type Record = HashMap<String, String>;

/// Parsed header row and data records, before any interpretation

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]

pub struct RawTable {
    pub headers: Vec<String>,

    pub records: Vec<Record>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.records.is_empty()
    }

    /// Number of data records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }
}

/// Funding state of a proposal

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCategory {
    Funded,

    NotFunded,

    UnderReview,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 3] = [
        StatusCategory::Funded,
        StatusCategory::NotFunded,
        StatusCategory::UnderReview,
    ];

    /// Stable key used by filters and the command line
    pub fn key(self) -> &'static str {
        match self {
            Self::Funded => "funded",
            Self::NotFunded => "not-funded",
            Self::UnderReview => "under-review",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Funded => "Funded",
            Self::NotFunded => "Not Funded",
            Self::UnderReview => "Under Review",
        }
    }

    /// Ordering used by the status sort: funded first, not funded last
    pub fn priority(self) -> u8 {
        match self {
            Self::Funded => 0,
            Self::UnderReview => 1,
            Self::NotFunded => 2,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.key() == key.trim().to_lowercase())
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized proposal, built once per sheet row and never mutated

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]

pub struct Proposal {
    pub title: String,

    /// Lowercased, accent-folded title, only used for ordering
    pub title_sort_key: String,

    /// Permalink target derived from the title; not guaranteed unique
    pub slug: String,

    pub cover_image_url: String,

    pub status_category: StatusCategory,

    pub status_label: String,

    // 贡献者
    pub name: String,

    pub description: String,

    pub technical_details: String,

    pub space_requirements: String,

    pub location_requirements: String,

    pub power_requirements: String,

    pub sound: String,

    pub safety: String,

    pub strike: String,

    pub co_creation: String,

    pub team: String,

    pub budget: String,

    /// Random draw in [0, 1) used for the default ordering
    pub display_order_key: f64,
}

/// Application error types

#[derive(Debug, thiserror::Error)]

pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] crate::core::fetcher::FetchError),

    #[error("Render error: {0}")]
    Render(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Render(err.to_string())
    }
}

/// Result type alias for application operations

pub type AppResult<T> = Result<T, AppError>;
