//! vendor-summary - vendor performance summary builder
//!
//! A CLI tool that aggregates purchases, sales and freight from an
//! inventory database per vendor and brand, derives profitability
//! metrics and writes the result back as a summary table.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (configuration, data access, data quality, write failure)

mod analysis;
mod cli;
mod config;
mod error;
mod inventory;
mod models;
mod report;
mod sink;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use inventory::Inventory;
use models::{ReportMetadata, VendorSalesSummary};
use sink::{CsvSink, SqliteSink, SummarySink};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let (config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let guard = match init_logging(&args, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("vendor-summary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Configuration ({}): {:?}", config_source, config);

    let exit_code = match run_summary(&args, &config) {
        Ok(()) => 0,
        Err(e) => {
            error!("Vendor summary failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            1
        }
    };

    // Flush the file log before exiting.
    drop(guard);
    std::process::exit(exit_code);
}

/// Handle --init-config: generate a default .vendor-summary.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Returns the config and a description of where it came from.
fn load_config(args: &Args) -> Result<(Config, String)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        (
            Config::load(config_path)?,
            config_path.display().to_string(),
        )
    } else {
        match Config::load_default()? {
            Some(config) => (config, DEFAULT_CONFIG_FILE.to_string()),
            None => (Config::default(), "defaults".to_string()),
        }
    };

    config.merge_with_args(args);
    Ok((config, source))
}

/// Initialize logging: console output on stderr, plus an optional DEBUG
/// log file appended under the configured log directory.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(args: &Args, config: &Config) -> Result<Option<WorkerGuard>> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(LevelFilter::from_level(args.log_level()));

    let (file_layer, guard) = if config.logging.file_enabled {
        let dir = &config.logging.dir;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

        let appender = tracing_appender::rolling::never(dir, &config.logging.file);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(writer)
            .with_filter(LevelFilter::DEBUG);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to set tracing subscriber")?;

    Ok(guard)
}

/// Run the complete summary workflow.
///
/// The inventory connection is released on both the success and the
/// error path.
fn run_summary(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    let inventory = Inventory::open(&config.database.path)?;
    let outcome = build_and_persist(&inventory, args, config, start_time);
    let closed = inventory.close();

    let rows = outcome?;
    closed?;

    if !args.quiet {
        println!("\n📊 Vendor Summary:");
        println!("   Rows: {}", rows);
        println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    info!("✅ Process Completed Successfully.");
    Ok(())
}

/// Aggregate, enrich and write the summary. Returns the number of rows built.
fn build_and_persist(
    inventory: &Inventory,
    args: &Args,
    config: &Config,
    start_time: Instant,
) -> Result<usize> {
    let sample_rows = config.logging.sample_rows;
    let table = config.output.table.as_str();

    sink::validate_output_table(table)?;
    inventory.verify_schema()?;

    info!("Creating Vendor Summary Table...");
    let spinner = spinner("Aggregating purchases, sales and freight...", args.quiet);
    let aggregated = analysis::create_vendor_summary(inventory.connection());
    spinner.finish_and_clear();
    let aggregated = aggregated?;
    info!(
        "Sample Summary Data:\n{}",
        report::preview_aggregates(&aggregated, sample_rows)
    );

    info!("Cleaning Data...");
    let summary = analysis::clean_data(aggregated)?;
    info!(
        "Sample Cleaned Data:\n{}",
        report::preview_summaries(&summary, sample_rows)
    );

    let rows_written = if args.dry_run {
        info!("Dry run: skipping ingestion into {}", table);
        0
    } else {
        info!("Ingesting data into database...");
        let mut table_sink = SqliteSink::new(inventory.connection(), config.output.if_exists);
        table_sink.ingest(table, &summary)?
    };

    if let Some(ref path) = args.export_csv {
        CsvSink::new(path, config.output.if_exists).ingest(table, &summary)?;
    }

    if let Some(ref path) = args.report {
        let metadata = ReportMetadata {
            database: inventory.path().display().to_string(),
            table: table.to_string(),
            if_exists: config.output.if_exists,
            dry_run: args.dry_run,
            rows_written,
            run_date: Utc::now(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        };
        write_report(path, args.format, metadata, &summary, config)?;
    }

    Ok(summary.len())
}

fn write_report(
    path: &Path,
    format: OutputFormat,
    metadata: ReportMetadata,
    summary: &[VendorSalesSummary],
    config: &Config,
) -> Result<()> {
    let run_report = report::build_report(
        metadata,
        summary,
        config.report.top_vendors,
        config.report.top_rows,
    );

    let output = match format {
        OutputFormat::Json => report::generate_json_report(&run_report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&run_report),
    };

    std::fs::write(path, &output)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report saved to: {}", path.display());

    Ok(())
}

fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
