//! Run report generation.
//!
//! This module builds a [`RunReport`] from the enriched summary and renders
//! it as Markdown or JSON.

use crate::analysis::{summary_totals, top_vendors};
use crate::models::{
    ReportMetadata, RunReport, SummaryRecord, SummaryTotals, VendorRollup, VendorSalesSummary,
};
use anyhow::Result;

/// Assemble the report for a finished run.
pub fn build_report(
    metadata: ReportMetadata,
    rows: &[VendorSalesSummary],
    vendor_limit: usize,
    row_limit: usize,
) -> RunReport {
    RunReport {
        metadata,
        totals: summary_totals(rows),
        top_vendors: top_vendors(rows, vendor_limit),
        top_rows: rows.iter().take(row_limit).map(SummaryRecord::from).collect(),
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str("# Vendor Sales Summary\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_totals_section(&report.totals));
    output.push_str(&generate_vendors_section(&report.top_vendors));
    output.push_str(&generate_rows_section(&report.top_rows));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Run\n\n");
    section.push_str(&format!("- **Database:** `{}`\n", metadata.database));
    if metadata.dry_run {
        section.push_str(&format!(
            "- **Output Table:** `{}` (dry run, not written)\n",
            metadata.table
        ));
    } else {
        section.push_str(&format!(
            "- **Output Table:** `{}` ({})\n",
            metadata.table, metadata.if_exists
        ));
    }
    section.push_str(&format!("- **Rows Written:** {}\n", metadata.rows_written));
    section.push_str(&format!(
        "- **Run Date:** {}\n",
        metadata.run_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_totals_section(totals: &SummaryTotals) -> String {
    let mut section = String::new();

    section.push_str("## Totals\n\n");
    section.push_str("| Vendors | Rows | Purchases | Sales | Gross Profit | Margin | Freight |\n");
    section.push_str("|:---:|:---:|---:|---:|---:|---:|---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2}% | {:.2} |\n\n",
        totals.vendors,
        totals.rows,
        totals.total_purchase_dollars,
        totals.total_sales_dollars,
        totals.gross_profit,
        totals.profit_margin,
        totals.freight_cost,
    ));

    if totals.unsold_rows > 0 {
        section.push_str(&format!(
            "{} vendor/brand rows have purchases but no recorded sales.\n\n",
            totals.unsold_rows
        ));
    }

    section
}

fn generate_vendors_section(vendors: &[VendorRollup]) -> String {
    if vendors.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Top Vendors by Gross Profit\n\n");
    section.push_str("| Vendor | Name | Brands | Purchases | Sales | Gross Profit | Margin | Freight |\n");
    section.push_str("|:---|:---|:---:|---:|---:|---:|---:|---:|\n");

    for v in vendors {
        section.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2}% | {:.2} |\n",
            v.vendor_number,
            escape_cell(&v.vendor_name),
            v.brands,
            v.total_purchase_dollars,
            v.total_sales_dollars,
            v.gross_profit,
            v.profit_margin,
            v.freight_cost,
        ));
    }
    section.push('\n');

    section
}

fn generate_rows_section(rows: &[SummaryRecord]) -> String {
    if rows.is_empty() {
        return "## Top Rows by Purchase Dollars\n\nNo vendor/brand rows were produced.\n\n"
            .to_string();
    }

    let mut section = String::new();

    section.push_str("## Top Rows by Purchase Dollars\n\n");
    section.push_str(
        "| Vendor | Brand | Description | Purchases | Sales | Gross Profit | Margin | Turnover |\n",
    );
    section.push_str("|:---|:---|:---|---:|---:|---:|---:|---:|\n");

    for r in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2}% | {:.2} |\n",
            r.vendor_number,
            r.brand,
            escape_cell(&r.description),
            r.total_purchase_dollars,
            r.total_sales_dollars,
            r.gross_profit,
            r.profit_margin,
            r.stock_turnover,
        ));
    }
    section.push('\n');

    section
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn generate_footer() -> String {
    "---\n\n*Report generated by vendor-summary*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
