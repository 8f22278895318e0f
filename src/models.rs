//! Data models for the vendor summary.
//!
//! This module contains the row types flowing through the pipeline
//! (aggregate rows, enriched rows, output records) and the run report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell read from a loosely typed column before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Integer(v) => write!(f, "{}", v),
            RawCell::Real(v) => write!(f, "{}", v),
            RawCell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the aggregation query, before enrichment.
///
/// Every column is nullable here: sales and freight come from left joins,
/// and the purchase columns carry whatever the source tables hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorBrandAggregate {
    pub vendor_number: Option<i64>,
    pub vendor_name: Option<String>,
    pub brand: Option<i64>,
    pub description: Option<String>,
    pub purchase_price: Option<f64>,
    pub actual_price: Option<f64>,
    pub volume: Option<RawCell>,
    pub total_purchase_quantity: Option<f64>,
    pub total_purchase_dollars: Option<f64>,
    pub total_sales_quantity: Option<f64>,
    pub total_sales_dollars: Option<f64>,
    pub total_sales_price: Option<f64>,
    pub total_excise_tax: Option<f64>,
    pub freight_cost: Option<f64>,
}

/// One fully populated summary row after enrichment.
///
/// Derived metrics are methods, so they always agree with the aggregate
/// columns they are computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSalesSummary {
    pub vendor_number: i64,
    pub vendor_name: String,
    pub brand: i64,
    pub description: String,
    pub purchase_price: f64,
    pub actual_price: f64,
    pub volume: f64,
    pub total_purchase_quantity: f64,
    pub total_purchase_dollars: f64,
    pub total_sales_quantity: f64,
    pub total_sales_dollars: f64,
    pub total_sales_price: f64,
    pub total_excise_tax: f64,
    pub freight_cost: f64,
}

/// Substitute 1 for a zero denominator.
///
/// Rows with a zero denominator get a value computed against 1 rather
/// than an undefined marker; downstream consumers depend on this.
pub fn safe_denominator(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

impl VendorSalesSummary {
    /// Sales dollars minus purchase dollars.
    pub fn gross_profit(&self) -> f64 {
        self.total_sales_dollars - self.total_purchase_dollars
    }

    /// Gross profit as a percentage of sales dollars.
    pub fn profit_margin(&self) -> f64 {
        (self.gross_profit() / safe_denominator(self.total_sales_dollars)) * 100.0
    }

    /// Units sold per unit purchased.
    pub fn stock_turnover(&self) -> f64 {
        self.total_sales_quantity / safe_denominator(self.total_purchase_quantity)
    }

    pub fn sales_to_purchase_ratio(&self) -> f64 {
        self.total_sales_dollars / safe_denominator(self.total_purchase_dollars)
    }
}

/// Flat output record, one per summary row, in output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummaryRecord {
    pub vendor_number: i64,
    pub vendor_name: String,
    pub brand: i64,
    pub description: String,
    pub purchase_price: f64,
    pub actual_price: f64,
    pub volume: f64,
    pub total_purchase_quantity: f64,
    pub total_purchase_dollars: f64,
    pub total_sales_quantity: f64,
    pub total_sales_dollars: f64,
    pub total_sales_price: f64,
    pub total_excise_tax: f64,
    pub freight_cost: f64,
    pub gross_profit: f64,
    pub profit_margin: f64,
    pub stock_turnover: f64,
    pub sales_to_purchase_ratio: f64,
}

impl From<&VendorSalesSummary> for SummaryRecord {
    fn from(row: &VendorSalesSummary) -> Self {
        Self {
            vendor_number: row.vendor_number,
            vendor_name: row.vendor_name.clone(),
            brand: row.brand,
            description: row.description.clone(),
            purchase_price: row.purchase_price,
            actual_price: row.actual_price,
            volume: row.volume,
            total_purchase_quantity: row.total_purchase_quantity,
            total_purchase_dollars: row.total_purchase_dollars,
            total_sales_quantity: row.total_sales_quantity,
            total_sales_dollars: row.total_sales_dollars,
            total_sales_price: row.total_sales_price,
            total_excise_tax: row.total_excise_tax,
            freight_cost: row.freight_cost,
            gross_profit: row.gross_profit(),
            profit_margin: row.profit_margin(),
            stock_turnover: row.stock_turnover(),
            sales_to_purchase_ratio: row.sales_to_purchase_ratio(),
        }
    }
}

/// How the sink treats an existing output table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    /// Drop and recreate the table (default)
    #[default]
    Replace,
    /// Keep existing rows and add new ones
    Append,
}

impl fmt::Display for IfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IfExists::Replace => write!(f, "replace"),
            IfExists::Append => write!(f, "append"),
        }
    }
}

/// Per-vendor rollup across all brands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRollup {
    pub vendor_number: i64,
    pub vendor_name: String,
    pub brands: usize,
    pub total_purchase_dollars: f64,
    pub total_sales_dollars: f64,
    pub gross_profit: f64,
    pub profit_margin: f64,
    /// Vendor-level freight, counted once.
    pub freight_cost: f64,
}

/// Totals across the whole summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub rows: usize,
    pub vendors: usize,
    pub total_purchase_dollars: f64,
    pub total_sales_dollars: f64,
    pub gross_profit: f64,
    pub profit_margin: f64,
    pub freight_cost: f64,
    /// Rows with no recorded sales.
    pub unsold_rows: usize,
}

/// Metadata about a summary run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub database: String,
    pub table: String,
    pub if_exists: IfExists,
    pub dry_run: bool,
    pub rows_written: usize,
    pub run_date: DateTime<Utc>,
    pub duration_seconds: f64,
}

/// The complete run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metadata: ReportMetadata,
    pub totals: SummaryTotals,
    pub top_vendors: Vec<VendorRollup>,
    pub top_rows: Vec<SummaryRecord>,
}
