//! Proposal Catalog - Core Library
//!
//! This library turns the published CSV export of a proposal spreadsheet into
//! normalized proposal records, and provides the filtering, sorting and
//! rendering used to browse them.

pub mod core;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use core::{
    catalog::{CatalogState, Navigator, SortMode, StatusFilters, ViewMode},
    config::AppConfig,
    fetcher::{FetchError, FileFetcher, HttpFetcher, TextFetcher},
    field_resolver::{resolve_field, FieldMapping},
    loader::{Catalog, CatalogLoader, EmptyReason, LoadOutcome},
    models::{AppError, AppResult, Proposal, RawTable, StatusCategory},
    normalizer::{classify_status, normalize, slugify, Normalizer},
};

pub use parsers::csv_parser::parse;
pub use utils::encoding::detect_encoding;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize the library with default settings
pub fn init() -> anyhow::Result<()> {
    // 初始化日志系统（重复初始化会被忽略）
    utils::logging::init_tracing("info");

    tracing::info!("📚 {} v{} initialized", NAME, VERSION);
    Ok(())
}
