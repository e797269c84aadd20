//! File parsing modules
//!
//! Contains the parser for the published sheet export.

pub mod csv_parser;

// Re-export commonly used parsers
pub use csv_parser::*;
