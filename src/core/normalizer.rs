//! Record normalization
//!
//! Turns parsed sheet records into [`Proposal`] values:
//!
//! - **Title filter**: rows without a resolvable title are dropped
//! - **Slug**: deterministic URL-safe identifier derived from the title
//! - **Status**: free text classified into funded / not funded / under review
//! - **Cover image**: export quoting stripped, placeholder when blank
//! - **Ordering key**: one random draw per proposal for the default order

use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use tracing::{debug, info};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::core::field_resolver::{resolve_field, FieldMapping};
use crate::core::models::{
    Proposal, RawTable, Record, StatusCategory, PLACEHOLDER_IMAGE, UNTITLED_PROPOSAL,
};

/// Converts a [`RawTable`] into proposals
#[derive(Debug, Clone)]
pub struct Normalizer {
    mapping: FieldMapping,
    placeholder_image: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            mapping: FieldMapping::default(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Set the image used for proposals without a cover; blank values are ignored
    pub fn with_placeholder_image(mut self, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        if !placeholder.trim().is_empty() {
            self.placeholder_image = placeholder.trim().to_string();
        }
        self
    }

    /// Normalize with thread-local randomness for the ordering keys
    pub fn normalize(&self, table: &RawTable) -> Vec<Proposal> {
        self.normalize_with_rng(table, &mut rand::thread_rng())
    }

    /// Normalize drawing ordering keys from `rng`
    pub fn normalize_with_rng<R: Rng + ?Sized>(&self, table: &RawTable, rng: &mut R) -> Vec<Proposal> {
        if table.headers.is_empty() || table.records.is_empty() {
            debug!("Nothing to normalize: empty table");
            return Vec::new();
        }

        let proposals: Vec<Proposal> = table
            .records
            .iter()
            .filter(|record| self.has_title(record, &table.headers))
            .map(|record| self.map_record(record, &table.headers, rng.gen::<f64>()))
            .collect();

        info!(
            "Normalized {} proposals from {} records",
            proposals.len(),
            table.records.len()
        );
        proposals
    }

    fn has_title(&self, record: &Record, headers: &[String]) -> bool {
        !resolve_field(record, headers, &self.mapping.title).is_empty()
    }

    /// Build one proposal from a record
    pub fn map_record(&self, record: &Record, headers: &[String], display_order_key: f64) -> Proposal {
        let get = |candidates: &[String]| resolve_field(record, headers, candidates);

        let mut title = get(&self.mapping.title);
        if title.is_empty() {
            title = UNTITLED_PROPOSAL.to_string();
        }
        let (status_category, status_label) = classify_status(&get(&self.mapping.status));
        let cover_image_url = resolve_image(&get(&self.mapping.image), &self.placeholder_image);

        Proposal {
            title_sort_key: title_sort_key(&title),
            slug: slugify(&title),
            title,
            cover_image_url,
            status_category,
            status_label: status_label.to_string(),
            name: get(&self.mapping.name),
            description: get(&self.mapping.description),
            technical_details: get(&self.mapping.technical_details),
            space_requirements: get(&self.mapping.space_requirements),
            location_requirements: get(&self.mapping.location_requirements),
            power_requirements: get(&self.mapping.power_requirements),
            sound: get(&self.mapping.sound),
            safety: get(&self.mapping.safety),
            strike: get(&self.mapping.strike),
            co_creation: get(&self.mapping.co_creation),
            team: get(&self.mapping.team),
            budget: get(&self.mapping.budget),
            display_order_key,
        }
    }
}

/// Normalize with the default column mapping and placeholder image
pub fn normalize(table: &RawTable) -> Vec<Proposal> {
    Normalizer::default().normalize(table)
}

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid slug pattern"))
}

fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s_-]+").expect("valid separator pattern"))
}

/// Derive a URL-safe slug from a title.
///
/// Lowercases, drops anything outside ASCII word characters, whitespace and
/// hyphens, then collapses separator runs into single hyphens. Idempotent.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = disallowed_chars().replace_all(lowered.trim(), "");
    let hyphenated = separator_runs().replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Lowercased title folded to base letters, so "Éclair" orders with "e"
pub fn title_sort_key(title: &str) -> String {
    title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}

/// Classify free-text status; "not funded" is checked before "funded"
pub fn classify_status(raw: &str) -> (StatusCategory, &'static str) {
    let normalized = raw.trim().to_lowercase();

    let category = if normalized.contains("not") && normalized.contains("funded") {
        StatusCategory::NotFunded
    } else if normalized.contains("funded") {
        StatusCategory::Funded
    } else {
        // "Under review", blanks and anything unrecognised
        StatusCategory::UnderReview
    };

    (category, category.label())
}

/// Strip one layer of export quoting and fall back to the placeholder
pub fn resolve_image(raw: &str, placeholder: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else if trimmed == "\"" {
        ""
    } else {
        trimmed
    };

    let url = unquoted.trim();
    if url.is_empty() {
        placeholder.to_string()
    } else {
        url.to_string()
    }
}
