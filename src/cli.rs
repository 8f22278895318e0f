//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::IfExists;
use clap::Parser;
use std::path::PathBuf;

/// vendor-summary - vendor performance summary for inventory databases
///
/// Joins purchases, sales and freight per vendor and brand, derives
/// profitability metrics and writes the result back as a table.
///
/// Examples:
///   vendor-summary --database inventory.db
///   vendor-summary -d inventory.db --table vendor_summary_q3 --if-exists append
///   vendor-summary -d inventory.db --dry-run --report summary.md
///   vendor-summary --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// SQLite inventory database
    ///
    /// Defaults to the config file value, then `inventory.db`.
    #[arg(short, long, value_name = "FILE", env = "VENDOR_SUMMARY_DB")]
    pub database: Option<PathBuf>,

    /// Output table name
    #[arg(short, long, value_name = "NAME")]
    pub table: Option<String>,

    /// What to do when the output table already exists
    #[arg(long, value_name = "MODE")]
    pub if_exists: Option<IfExists>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .vendor-summary.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rows shown in sample log lines
    #[arg(long, value_name = "N")]
    pub sample_rows: Option<usize>,

    /// Directory for the log file
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log to the console only
    #[arg(long)]
    pub no_log_file: bool,

    /// Write a run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Also export the summary as CSV
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Build the summary without writing the output table
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .vendor-summary.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref table) = self.table {
            crate::sink::validate_output_table(table).map_err(|e| e.to_string())?;
        }

        if let Some(ref database) = self.database {
            if database.is_dir() {
                return Err(format!(
                    "Database path is a directory: {}",
                    database.display()
                ));
            }
        }

        if let (Some(report), Some(csv)) = (&self.report, &self.export_csv) {
            if report == csv {
                return Err("--report and --export-csv must be different files".to_string());
            }
        }

        Ok(())
    }

    /// Returns the console log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            database: Some(PathBuf::from("inventory.db")),
            table: None,
            if_exists: None,
            config: None,
            sample_rows: None,
            log_dir: None,
            no_log_file: false,
            report: None,
            format: OutputFormat::Markdown,
            export_csv: None,
            dry_run: false,
            init_config: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "vendor-summary",
            "-d",
            "data.db",
            "--table",
            "summary_q3",
            "--if-exists",
            "append",
            "--format",
            "json",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.database, Some(PathBuf::from("data.db")));
        assert_eq!(args.table.as_deref(), Some("summary_q3"));
        assert_eq!(args.if_exists, Some(IfExists::Append));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.dry_run);
    }

    #[test]
    fn test_validation_invalid_table() {
        let mut args = make_args();
        args.table = Some("bad name".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_source_table_refused() {
        let mut args = make_args();
        args.table = Some("vendor_invoice".to_string());
        assert!(args.validate().is_err());

        args.table = Some("vendor_sales_summary".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_same_output_files() {
        let mut args = make_args();
        args.report = Some(PathBuf::from("out.txt"));
        args.export_csv = Some(PathBuf::from("out.txt"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
