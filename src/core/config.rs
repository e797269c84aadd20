//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::catalog::{SortMode, ViewMode};
use super::fetcher::FetcherConfig;
use super::field_resolver::FieldMapping;
use super::models::PLACEHOLDER_IMAGE;
use crate::utils::network::get_user_agent;
use crate::utils::validation::{is_http_url, validate_url};

/// Published export of the proposals sheet
pub const DEFAULT_SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSGOuiHGuAinQZKdFPFfNE3w_h8Q-_LkpVz_fdEC31CNk0mentc8Ct-G2MjlrfilHaItfQ4xgwaEBil/pub?output=csv";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub display: DisplayConfig,
    /// `field -> [header, ...]` overrides for column resolution
    #[serde(default)]
    pub field_mapping: Option<HashMap<String, Vec<String>>>,
    pub advanced: AdvancedConfig,
}

/// Where the sheet comes from and how to fetch it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String, // http(s) URL, file:// URL or local path
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Listing defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub placeholder_image: String,
    pub default_sort: SortMode,
    pub default_view: ViewMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    pub log_level: String, // "error", "warn", "info", "debug", "trace"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            display: DisplayConfig::default(),
            field_mapping: None,
            advanced: AdvancedConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: get_user_agent(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            default_sort: SortMode::Default,
            default_view: ViewMode::Cards,
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file, creating default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load from an explicit path, writing defaults there when missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: AppConfig =
                serde_json::from_str(&content).with_context(|| "Failed to parse config file")?;

            tracing::info!("Loaded configuration from: {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = self.export()?;

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved configuration to: {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("org", "proposalcatalog", "catalog")
            .with_context(|| "Failed to get project directories")?;

        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Reset configuration to defaults
    pub fn reset() -> Result<Self> {
        let config = Self::default();
        config.save()?;
        tracing::info!("Reset configuration to defaults");
        Ok(config)
    }

    /// Export configuration as JSON string
    pub fn export(&self) -> Result<String> {
        serde_json::to_string_pretty(self).with_context(|| "Failed to export configuration")
    }

    /// Parse and validate configuration JSON
    pub fn import(json: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(json).with_context(|| "Failed to parse imported configuration")?;

        config
            .validate()
            .with_context(|| "Imported configuration is invalid")?;

        Ok(config)
    }

    /// Settings for the HTTP fetcher
    pub fn fetcher_config(&self) -> FetcherConfig {
        let user_agent = if self.source.user_agent.trim().is_empty() {
            get_user_agent()
        } else {
            self.source.user_agent.clone()
        };
        FetcherConfig {
            timeout: Duration::from_secs(self.source.timeout_seconds),
            user_agent,
        }
    }

    /// Default mapping with any configured overrides applied
    pub fn field_mapping(&self) -> FieldMapping {
        match &self.field_mapping {
            Some(overrides) => FieldMapping::default().with_overrides(overrides),
            None => FieldMapping::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let source = self.source.url.trim();
        if source.is_empty() {
            anyhow::bail!("Source URL must not be empty");
        }
        if source.contains("://") && !is_http_url(source) && !source.starts_with("file://") {
            anyhow::bail!("Unsupported source scheme: {}", source);
        }
        if is_http_url(source) || source.starts_with("file://") {
            validate_url(source)?;
        }

        if self.source.timeout_seconds == 0 || self.source.timeout_seconds > 300 {
            anyhow::bail!("Timeout should be between 1 and 300 seconds");
        }

        if self.display.placeholder_image.trim().is_empty() {
            anyhow::bail!("Placeholder image must not be empty");
        }

        if let Some(ref overrides) = self.field_mapping {
            let mut probe = FieldMapping::default();
            for (field, candidates) in overrides {
                if probe.candidates_mut(field).is_none() {
                    anyhow::bail!("Unknown field in column mapping: {}", field);
                }
                if candidates.iter().all(|c| c.trim().is_empty()) {
                    anyhow::bail!("Column mapping for '{}' has no header names", field);
                }
            }
        }

        if !LOG_LEVELS.contains(&self.advanced.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level: must be 'error', 'warn', 'info', 'debug', or 'trace'"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = config.export().unwrap();
        let parsed_config = AppConfig::import(&json).unwrap();

        assert_eq!(config.export().unwrap(), parsed_config.export().unwrap());
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = AppConfig::default();

        config.source.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.source.url = "ftp://example.com/sheet.csv".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.source.url = "   ".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.display.placeholder_image = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.advanced.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        let mut overrides = HashMap::new();
        overrides.insert("colour".to_string(), vec!["Colour".to_string()]);
        config.field_mapping = Some(overrides);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_path_source_is_valid() {
        let mut config = AppConfig::default();
        config.source.url = "./exports/proposals.csv".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_field_mapping_overrides() {
        let mut config = AppConfig::default();
        let mut overrides = HashMap::new();
        overrides.insert("budget".to_string(), vec!["Cost".to_string()]);
        config.field_mapping = Some(overrides);

        assert!(config.validate().is_ok());
        assert_eq!(config.field_mapping().budget, vec!["Cost"]);
    }

    #[test]
    fn test_fetcher_config() {
        let mut config = AppConfig::default();
        config.source.timeout_seconds = 12;
        config.source.user_agent = " ".to_string();

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.timeout, Duration::from_secs(12));
        assert_eq!(fetcher.user_agent, get_user_agent());
    }
}
