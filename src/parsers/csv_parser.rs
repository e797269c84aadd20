//! CSV parsing for published spreadsheet exports
//!
//! Spreadsheet exports are loosely structured: quoted cells may span lines,
//! rows may be ragged and trailing blank lines are common. The parser never
//! rejects input; it always produces a best-effort [`RawTable`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::models::{RawTable, Record};

/// Row counts collected while building a [`RawTable`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Data rows committed by the scanner (header excluded)
    pub total_rows: usize,
    /// Rows that became records
    pub parsed_rows: usize,
    /// Rows dropped because every named value was blank
    pub skipped_rows: usize,
}

/// Parse CSV text into headers and name-keyed records
pub fn parse(text: &str) -> RawTable {
    parse_with_stats(text).0
}

/// Parse CSV text and report how many rows were kept
pub fn parse_with_stats(text: &str) -> (RawTable, ParseStats) {
    if text.trim().is_empty() {
        return (RawTable::default(), ParseStats::default());
    }

    let mut rows = split_rows(text).into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|h| h.trim().to_string()).collect(),
        None => return (RawTable::default(), ParseStats::default()),
    };

    let mut stats = ParseStats::default();
    let mut records = Vec::new();

    for row in rows {
        stats.total_rows += 1;
        let record = build_record(&headers, &row);
        if is_blank_record(&record) {
            stats.skipped_rows += 1;
            continue;
        }
        records.push(record);
        stats.parsed_rows += 1;
    }

    debug!(
        "CSV parsed: headers={}, rows={}, records={}, skipped={}",
        headers.len(),
        stats.total_rows,
        stats.parsed_rows,
        stats.skipped_rows
    );

    (RawTable { headers, records }, stats)
}

/// Scan the text into rows of trimmed fields, dropping rows with no content
fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut scanner = RowScanner::default();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if scanner.in_quotes && chars.peek() == Some(&'"') {
                    scanner.field.push('"');
                    chars.next();
                } else {
                    scanner.in_quotes = !scanner.in_quotes;
                }
            }
            ',' if !scanner.in_quotes => scanner.close_field(),
            '\n' | '\r' if !scanner.in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                scanner.close_row();
            }
            _ => scanner.field.push(ch),
        }
    }

    if !scanner.field.is_empty() || !scanner.row.is_empty() {
        scanner.close_row();
    }

    scanner.rows
}

#[derive(Default)]
struct RowScanner {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    field: String,
    in_quotes: bool,
}

impl RowScanner {
    fn close_field(&mut self) {
        let field = std::mem::take(&mut self.field);
        self.row.push(field.trim().to_string());
    }

    fn close_row(&mut self) {
        self.close_field();
        let row = std::mem::take(&mut self.row);
        if row.iter().any(|cell| !cell.trim().is_empty()) {
            self.rows.push(row);
        }
    }
}

/// Map a positional row onto header names; later duplicate headers win
fn build_record(headers: &[String], row: &[String]) -> Record {
    let mut record = Record::with_capacity(headers.len());
    for (index, header) in headers.iter().enumerate() {
        let value = row.get(index).map(|cell| cell.trim()).unwrap_or("");
        record.insert(header.clone(), value.to_string());
    }
    record
}

fn is_blank_record(record: &Record) -> bool {
    record.values().all(|value| value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), RawTable::default());
        assert_eq!(parse("   \n\n"), RawTable::default());
        assert_eq!(parse("\r\n  ,  \r\n"), RawTable::default());
    }

    #[test]
    fn test_quoted_field_with_escaped_quotes() {
        let table = parse("Name,Note\nAda,\"Hello, \"\"world\"\"\"");

        assert_eq!(table.headers, vec!["Name", "Note"]);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0]["Name"], "Ada");
        assert_eq!(table.records[0]["Note"], "Hello, \"world\"");
    }

    #[test]
    fn test_commas_inside_quotes() {
        let table = parse("a,\"b,c\",d\n1,\"2,3\",4");

        assert_eq!(table.headers, vec!["a", "b,c", "d"]);
        assert_eq!(table.records[0]["b,c"], "2,3");
        assert_eq!(table.records[0]["d"], "4");
    }

    #[test]
    fn test_newline_inside_quotes_stays_in_field() {
        let table = parse("Title,Description\nLantern,\"line one\nline two\"\n");

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0]["Description"], "line one\nline two");
    }

    #[test]
    fn test_crlf_and_lone_cr_terminators() {
        let table = parse("Title,Team\r\nDome,Ops\rBridge,Crew\r\n");

        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0]["Title"], "Dome");
        assert_eq!(table.records[1]["Team"], "Crew");
    }

    #[test]
    fn test_trailing_blank_lines_produce_no_records() {
        let (table, stats) = parse_with_stats("Title\nOne\n\n\n   \n");

        assert_eq!(table.records.len(), 1);
        assert_eq!(stats.total_rows, 1);
        assert_eq!(stats.skipped_rows, 0);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let table = parse("  Title  , Status \n  Arch ,  Funded  ");

        assert_eq!(table.headers, vec!["Title", "Status"]);
        assert_eq!(table.records[0]["Title"], "Arch");
        assert_eq!(table.records[0]["Status"], "Funded");
    }

    #[test]
    fn test_ragged_rows() {
        let table = parse("Title,Team,Budget\nShort\nLong,A,B,extra");

        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0]["Team"], "");
        assert_eq!(table.records[0]["Budget"], "");
        assert_eq!(table.records[1]["Budget"], "B");
        assert_eq!(table.records[1].len(), 3);
    }

    #[test]
    fn test_row_with_only_unnamed_content_is_dropped() {
        let (table, stats) = parse_with_stats("Title,Team\n,,stray\nKept,\n");

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0]["Title"], "Kept");
        assert_eq!(stats.total_rows, 2);
        assert_eq!(stats.skipped_rows, 1);
        assert_eq!(stats.parsed_rows, 1);
    }

    #[test]
    fn test_duplicate_headers_last_column_wins() {
        let table = parse("Title,Title\nfirst,second");

        assert_eq!(table.headers, vec!["Title", "Title"]);
        assert_eq!(table.records[0].len(), 1);
        assert_eq!(table.records[0]["Title"], "second");
    }

    #[test]
    fn test_unbalanced_quote_runs_to_end() {
        let table = parse("Title,Note\nOpen,\"never closed, still going\nnext");

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0]["Note"], "never closed, still going\nnext");
    }

    #[test]
    fn test_quotes_toggle_mid_field() {
        let table = parse("Title\nab\"c,d\"e");

        assert_eq!(table.records[0]["Title"], "abc,de");
    }

    #[test]
    fn test_header_only() {
        let table = parse("Title,Status\n");

        assert_eq!(table.headers, vec!["Title", "Status"]);
        assert!(table.records.is_empty());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_record_keys_are_headers() {
        let inputs = [
            "a,b\n1,2,3\n4",
            "\"x\ny\",z\n\"\"\"\",q",
            ",,\n1,,\n,,2",
            "h\n\"unterminated",
        ];

        for input in inputs {
            let table = parse(input);
            for record in &table.records {
                for key in record.keys() {
                    assert!(table.headers.contains(key), "{key:?} missing in {input:?}");
                }
            }
        }
    }
}
