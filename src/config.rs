//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.vendor-summary.toml` files.

use crate::models::IfExists;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = ".vendor-summary.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Inventory database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Output table settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite inventory database.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("inventory.db")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Name of the summary table.
    #[serde(default = "default_table")]
    pub table: String,

    /// Replace or append to an existing table.
    #[serde(default)]
    pub if_exists: IfExists,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            if_exists: IfExists::default(),
        }
    }
}

fn default_table() -> String {
    "vendor_sales_summary".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the log file.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Log file name inside `dir`.
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Write a DEBUG-level log file in addition to console output.
    #[serde(default = "default_true")]
    pub file_enabled: bool,

    /// Rows shown in sample log lines.
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
            file_enabled: true,
            sample_rows: default_sample_rows(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file() -> String {
    "vendor_summary.log".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sample_rows() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Vendors listed in the report.
    #[serde(default = "default_top_n")]
    pub top_vendors: usize,

    /// Summary rows listed in the report.
    #[serde(default = "default_top_n")]
    pub top_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_vendors: default_top_n(),
            top_rows: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref database) = args.database {
            self.database.path = database.clone();
        }
        if let Some(ref table) = args.table {
            self.output.table = table.clone();
        }
        if let Some(if_exists) = args.if_exists {
            self.output.if_exists = if_exists;
        }
        if let Some(ref log_dir) = args.log_dir {
            self.logging.dir = log_dir.clone();
        }
        if args.no_log_file {
            self.logging.file_enabled = false;
        }
        if let Some(sample_rows) = args.sample_rows {
            self.logging.sample_rows = sample_rows;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
