//! Core business logic module
//!
//! This module contains the domain models, record normalization, catalog view
//! state and loading for the proposal catalog.

pub mod catalog;
pub mod config;
pub mod fetcher;
pub mod field_resolver;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod render;



#[cfg(test)]
mod loader_integration_tests;

// Re-export commonly used types
pub use config::AppConfig;
pub use loader::CatalogLoader;
