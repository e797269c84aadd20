//! Plain-text renderings of a catalog listing

use std::fmt::Write as _;
use std::io;

use crate::core::catalog::{detail_sections, Navigator};
use crate::core::models::{AppResult, Proposal};

pub const EMPTY_LISTING: &str = "No proposals match the selected filters.";
pub const NO_DESCRIPTION: &str = "No description provided.";
const MISSING_CELL: &str = "—";

/// One block per proposal: title, status, author, summary
pub fn render_cards(list: &[&Proposal]) -> String {
    if list.is_empty() {
        return format!("{EMPTY_LISTING}\n");
    }

    let mut out = String::new();
    for (index, proposal) in list.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}  [{}]", proposal.title, proposal.status_label);
        if !proposal.name.is_empty() {
            let _ = writeln!(out, "  by {}", proposal.name);
        }
        let summary = if proposal.description.is_empty() {
            NO_DESCRIPTION
        } else {
            proposal.description.as_str()
        };
        for line in summary.lines() {
            let _ = writeln!(out, "  {line}");
        }
        let _ = writeln!(out, "  #{}", proposal.slug);
    }
    out
}

/// Full view of a single proposal
pub fn render_detail(proposal: &Proposal, position: Option<&Navigator>) -> String {
    let mut out = String::new();

    if let Some(label) = position.and_then(Navigator::position_label) {
        let _ = writeln!(out, "({label})");
    }
    let _ = writeln!(out, "{}", proposal.title);
    if !proposal.name.is_empty() {
        let _ = writeln!(out, "by {}", proposal.name);
    }
    let _ = writeln!(out, "Status: {}", proposal.status_label);
    let _ = writeln!(out, "Image: {}", proposal.cover_image_url);
    let _ = writeln!(out, "Link: #{}", proposal.slug);
    out.push('\n');

    let summary = if proposal.description.is_empty() {
        NO_DESCRIPTION
    } else {
        proposal.description.as_str()
    };
    let _ = writeln!(out, "{summary}");

    for section in detail_sections(proposal) {
        let _ = writeln!(out, "\n## {}", section.label);
        let _ = writeln!(out, "{}", section.value);
    }
    out
}

/// Title / Artist / Status / Slug / Details table as CSV
pub fn render_table_csv<W: io::Write>(list: &[&Proposal], writer: W) -> AppResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Title", "Artist", "Status", "Slug", "Details"])?;

    for proposal in list {
        let artist = if proposal.name.is_empty() {
            MISSING_CELL
        } else {
            proposal.name.as_str()
        };
        csv_writer.write_record([
            proposal.title.as_str(),
            artist,
            proposal.status_label.as_str(),
            proposal.slug.as_str(),
            details_cell(proposal).as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn details_cell(proposal: &Proposal) -> String {
    let mut parts = Vec::new();
    if !proposal.description.is_empty() {
        parts.push(proposal.description.clone());
    }
    for section in detail_sections(proposal) {
        parts.push(format!("{}: {}", section.label, section.value));
    }
    if parts.is_empty() {
        MISSING_CELL.to_string()
    } else {
        parts.join("\n")
    }
}
