//! Column resolution for sheets whose headers drift between exports
//!
//! A logical field (title, budget, ...) is looked up through an ordered list of
//! acceptable header spellings. Exact header names are tried first; if none of
//! them yields a value, headers are compared case-insensitively by substring in
//! both directions. Ties resolve to the first candidate and then the first
//! matching header, in listed order.

use std::collections::HashMap;

use tracing::warn;

use crate::core::models::Record;

/// Candidate header spellings for every proposal field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub title: Vec<String>,
    pub name: Vec<String>,
    pub description: Vec<String>,
    pub technical_details: Vec<String>,
    pub space_requirements: Vec<String>,
    pub location_requirements: Vec<String>,
    pub power_requirements: Vec<String>,
    pub sound: Vec<String>,
    pub safety: Vec<String>,
    pub strike: Vec<String>,
    pub co_creation: Vec<String>,
    pub team: Vec<String>,
    pub budget: Vec<String>,
    pub image: Vec<String>,
    pub status: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            title: names(&["Title", "title"]),
            name: names(&["Name", "name"]),
            description: names(&["Description", "description"]),
            technical_details: names(&["Technical details", "Technical Details"]),
            space_requirements: names(&["Space requirements", "Space Requirements"]),
            location_requirements: names(&["Location requirements", "Location Requirements"]),
            power_requirements: names(&["Power requirements", "Power Requirements"]),
            sound: names(&["Sound", "sound"]),
            safety: names(&["Safety", "safety"]),
            strike: names(&["Strike", "strike"]),
            co_creation: names(&["Co-creation", "Co-creation"]),
            team: names(&["Team", "team"]),
            budget: names(&["Budget", "budget"]),
            image: names(&["Image", "image"]),
            status: names(&["Status", "status"]),
        }
    }
}

impl FieldMapping {
    /// Candidate list for a field by its snake_case name
    pub fn candidates_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        let slot = match field {
            "title" => &mut self.title,
            "name" => &mut self.name,
            "description" => &mut self.description,
            "technical_details" => &mut self.technical_details,
            "space_requirements" => &mut self.space_requirements,
            "location_requirements" => &mut self.location_requirements,
            "power_requirements" => &mut self.power_requirements,
            "sound" => &mut self.sound,
            "safety" => &mut self.safety,
            "strike" => &mut self.strike,
            "co_creation" => &mut self.co_creation,
            "team" => &mut self.team,
            "budget" => &mut self.budget,
            "image" => &mut self.image,
            "status" => &mut self.status,
            _ => return None,
        };
        Some(slot)
    }

    /// Replace candidate lists from a `field -> [header, ...]` table.
    ///
    /// Unknown field names and empty lists are ignored with a warning.
    pub fn with_overrides(mut self, overrides: &HashMap<String, Vec<String>>) -> Self {
        for (field, candidates) in overrides {
            if candidates.is_empty() {
                warn!("Ignoring empty column override for field '{}'", field);
                continue;
            }
            match self.candidates_mut(field) {
                Some(slot) => *slot = candidates.clone(),
                None => warn!("Ignoring column override for unknown field '{}'", field),
            }
        }
        self
    }
}

/// Resolve one logical field of a record, returning `""` when nothing matches
pub fn resolve_field<S: AsRef<str>>(record: &Record, headers: &[String], candidates: &[S]) -> String {
    for candidate in candidates {
        if let Some(value) = non_empty(record.get(candidate.as_ref())) {
            return value;
        }
    }

    for candidate in candidates {
        let needle = candidate.as_ref().trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        for header in headers {
            if !header_matches(header, &needle) {
                continue;
            }
            if let Some(value) = non_empty(record.get(header)) {
                return value;
            }
        }
    }

    String::new()
}

fn header_matches(header: &str, needle: &str) -> bool {
    let normalized = header.trim().to_lowercase();
    if normalized.is_empty() {
        return false;
    }
    normalized.contains(needle) || needle.contains(normalized.as_str())
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> (Record, Vec<String>) {
        let headers = pairs.iter().map(|(h, _)| h.to_string()).collect();
        let record = pairs
            .iter()
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        (record, headers)
    }

    #[test]
    fn test_exact_match() {
        let (rec, headers) = record(&[("Title", "Lantern"), ("Team", "Ops")]);
        assert_eq!(resolve_field(&rec, &headers, &["Title", "title"]), "Lantern");
    }

    #[test]
    fn test_case_and_trailing_space_variation() {
        let (rec, headers) = record(&[("technical details ", "12V only")]);
        assert_eq!(
            resolve_field(&rec, &headers, &["Technical details", "Technical Details"]),
            "12V only"
        );
    }

    #[test]
    fn test_header_contains_candidate() {
        let (rec, headers) = record(&[("Budget (EUR)", "1200")]);
        assert_eq!(resolve_field(&rec, &headers, &["Budget", "budget"]), "1200");
    }

    #[test]
    fn test_candidate_contains_header() {
        let (rec, headers) = record(&[("Space", "10x10m")]);
        assert_eq!(
            resolve_field(&rec, &headers, &["Space requirements"]),
            "10x10m"
        );
    }

    #[test]
    fn test_exact_phase_beats_relaxed_phase() {
        let (rec, headers) = record(&[("Project title", "Fuzzy"), ("title", "Exact")]);
        assert_eq!(resolve_field(&rec, &headers, &["Title", "title"]), "Exact");
    }

    #[test]
    fn test_relaxed_phase_first_header_in_order() {
        let (rec, headers) = record(&[("Team lead", "Ana"), ("Team size", "4")]);
        assert_eq!(resolve_field(&rec, &headers, &["Team"]), "Ana");
    }

    #[test]
    fn test_relaxed_phase_skips_empty_values() {
        let (rec, headers) = record(&[("Team lead", ""), ("Team size", "4")]);
        assert_eq!(resolve_field(&rec, &headers, &["Team"]), "4");
    }

    #[test]
    fn test_blank_exact_value_falls_through() {
        let (rec, headers) = record(&[("Title", "  "), ("TITLE ", "Caps")]);
        assert_eq!(resolve_field(&rec, &headers, &["Title", "title"]), "Caps");
    }

    #[test]
    fn test_blank_header_never_matches() {
        let (rec, headers) = record(&[("Title", ""), ("", "stray")]);
        assert_eq!(resolve_field(&rec, &headers, &["Title", "title"]), "");
    }

    #[test]
    fn test_no_match_returns_empty() {
        let (rec, headers) = record(&[("Team", "Ops")]);
        assert_eq!(resolve_field(&rec, &headers, &["Budget"]), "");
        assert_eq!(resolve_field::<&str>(&rec, &headers, &[]), "");
    }

    #[test]
    fn test_value_is_trimmed() {
        let (rec, headers) = record(&[("Sound", "  quiet  ")]);
        assert_eq!(resolve_field(&rec, &headers, &["Sound"]), "quiet");
    }

    #[test]
    fn test_overrides_replace_known_fields() {
        let mut overrides = HashMap::new();
        overrides.insert("budget".to_string(), vec!["Cost".to_string()]);
        overrides.insert("unknown".to_string(), vec!["X".to_string()]);
        overrides.insert("team".to_string(), Vec::new());

        let mapping = FieldMapping::default().with_overrides(&overrides);

        assert_eq!(mapping.budget, vec!["Cost"]);
        assert_eq!(mapping.team, vec!["Team", "team"]);
    }
}
