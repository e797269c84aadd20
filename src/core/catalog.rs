//! Catalog view state
//!
//! Filter, sort, search and view settings chosen by the user. The state is a
//! plain value owned by the front end and passed to [`CatalogState::apply`];
//! proposals themselves are never touched.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::models::{Proposal, StatusCategory};

/// Per-status inclusion flags, all enabled by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFilters {
    pub funded: bool,
    pub not_funded: bool,
    pub under_review: bool,
}

impl Default for StatusFilters {
    fn default() -> Self {
        Self {
            funded: true,
            not_funded: true,
            under_review: true,
        }
    }
}

impl StatusFilters {
    fn slot(&mut self, status: StatusCategory) -> &mut bool {
        match status {
            StatusCategory::Funded => &mut self.funded,
            StatusCategory::NotFunded => &mut self.not_funded,
            StatusCategory::UnderReview => &mut self.under_review,
        }
    }

    pub fn is_enabled(&self, status: StatusCategory) -> bool {
        match status {
            StatusCategory::Funded => self.funded,
            StatusCategory::NotFunded => self.not_funded,
            StatusCategory::UnderReview => self.under_review,
        }
    }

    pub fn set(&mut self, status: StatusCategory, enabled: bool) {
        *self.slot(status) = enabled;
    }

    /// Flip one flag and return its new value
    pub fn toggle(&mut self, status: StatusCategory) -> bool {
        let slot = self.slot(status);
        *slot = !*slot;
        *slot
    }
}

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Random order drawn at load time
    #[default]
    Default,
    TitleAsc,
    TitleDesc,
    /// Funded, then under review, then not funded; title within a status
    Status,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
            Self::Status => "status",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "default" => Ok(Self::Default),
            "title-asc" => Ok(Self::TitleAsc),
            "title-desc" => Ok(Self::TitleDesc),
            "status" => Ok(Self::Status),
            other => Err(format!("Unknown sort mode: {other}")),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "cards" => Ok(Self::Cards),
            "table" => Ok(Self::Table),
            other => Err(format!("Unknown view mode: {other}")),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cards => f.write_str("cards"),
            Self::Table => f.write_str("table"),
        }
    }
}

/// User-selected listing parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    pub status_filters: StatusFilters,
    pub sort_mode: SortMode,
    pub view_mode: ViewMode,
    search_query: String,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the query trimmed and lowercased
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.trim().to_lowercase();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Status filter and search match
    pub fn matches(&self, proposal: &Proposal) -> bool {
        if !self.status_filters.is_enabled(proposal.status_category) {
            return false;
        }
        self.search_query.is_empty() || searchable_text(proposal).contains(&self.search_query)
    }

    /// Filter then sort; ties keep input order
    pub fn apply<'a>(&self, proposals: &'a [Proposal]) -> Vec<&'a Proposal> {
        let mut list: Vec<&Proposal> = proposals.iter().filter(|p| self.matches(p)).collect();
        sort_proposals(&mut list, self.sort_mode);
        list
    }

    /// Listing to step through from `slug`, with the proposal's position in it.
    ///
    /// The filtered listing is used when it holds the proposal, otherwise every
    /// proposal. The random default order is replaced by title order so that
    /// stepping gives the same neighbours on every load.
    pub fn navigation<'a>(
        &self,
        proposals: &'a [Proposal],
        slug: &str,
    ) -> Option<(Vec<&'a Proposal>, Navigator)> {
        let mode = match self.sort_mode {
            SortMode::Default => SortMode::TitleAsc,
            other => other,
        };

        let mut listing: Vec<&Proposal> = proposals.iter().filter(|p| self.matches(p)).collect();
        sort_proposals(&mut listing, mode);
        if let Some(position) = Navigator::locate(&listing, slug) {
            return Some((listing, position));
        }

        let mut everything: Vec<&Proposal> = proposals.iter().collect();
        sort_proposals(&mut everything, mode);
        Navigator::locate(&everything, slug).map(|position| (everything, position))
    }
}

/// Text matched by the search box, lowercased
pub fn searchable_text(proposal: &Proposal) -> String {
    [
        proposal.title.as_str(),
        proposal.name.as_str(),
        proposal.description.as_str(),
        proposal.technical_details.as_str(),
        proposal.space_requirements.as_str(),
        proposal.location_requirements.as_str(),
        proposal.team.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Stable sort in place
pub fn sort_proposals(list: &mut [&Proposal], mode: SortMode) {
    match mode {
        SortMode::Default => list.sort_by(|a, b| {
            a.display_order_key
                .partial_cmp(&b.display_order_key)
                .unwrap_or(Ordering::Equal)
        }),
        SortMode::TitleAsc => list.sort_by(|a, b| a.title_sort_key.cmp(&b.title_sort_key)),
        SortMode::TitleDesc => list.sort_by(|a, b| b.title_sort_key.cmp(&a.title_sort_key)),
        SortMode::Status => list.sort_by(|a, b| {
            a.status_category
                .priority()
                .cmp(&b.status_category.priority())
                .then_with(|| a.title_sort_key.cmp(&b.title_sort_key))
        }),
    }
}

/// First proposal whose slug matches; duplicates resolve to the earliest
pub fn find_by_slug<'a>(proposals: &'a [Proposal], slug: &str) -> Option<&'a Proposal> {
    let slug = slug.trim().trim_start_matches('#');
    proposals.iter().find(|p| p.slug == slug)
}

/// Position of a proposal inside a listing, with wrap-around stepping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
    len: usize,
}

impl Navigator {
    /// Locate `slug` in `list`; `None` if absent
    pub fn locate(list: &[&Proposal], slug: &str) -> Option<Self> {
        list.iter().position(|p| p.slug == slug).map(|index| Self {
            index,
            len: list.len(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move by `offset`, wrapping at both ends
    pub fn step(&self, offset: isize) -> Self {
        let len = self.len as isize;
        let index = (self.index as isize + offset).rem_euclid(len) as usize;
        Self { index, len: self.len }
    }

    pub fn next(&self) -> Self {
        self.step(1)
    }

    pub fn prev(&self) -> Self {
        self.step(-1)
    }

    /// "k / n" label, only meaningful with more than one entry
    pub fn position_label(&self) -> Option<String> {
        (self.len > 1).then(|| format!("{} / {}", self.index + 1, self.len))
    }
}

/// A labelled optional section of a proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection<'a> {
    pub label: &'static str,
    pub value: &'a str,
}

/// Non-empty optional sections in display order
pub fn detail_sections(proposal: &Proposal) -> Vec<DetailSection<'_>> {
    [
        ("Technical Details", proposal.technical_details.as_str()),
        ("Space Requirements", proposal.space_requirements.as_str()),
        ("Location Requirements", proposal.location_requirements.as_str()),
        ("Power Requirements", proposal.power_requirements.as_str()),
        ("Sound", proposal.sound.as_str()),
        ("Safety", proposal.safety.as_str()),
        ("Strike", proposal.strike.as_str()),
        ("Co-creation", proposal.co_creation.as_str()),
        ("Team", proposal.team.as_str()),
        ("Budget", proposal.budget.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| DetailSection { label, value })
    .collect()
}
