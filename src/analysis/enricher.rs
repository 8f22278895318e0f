//! Cleaning and enrichment of the aggregated summary.

use crate::error::{EtlError, EtlResult};
use crate::models::{RawCell, VendorBrandAggregate, VendorSalesSummary};
use tracing::debug;

/// Text value used when a text column is null.
const TEXT_FILL: &str = "0";

/// Clean the aggregate rows into fully populated summary rows.
///
/// In order: coerce Volume to a float, fill every null with 0, trim the
/// vendor name and description. Derived metrics are computed on demand by
/// [`VendorSalesSummary`]. Row order is preserved.
pub fn clean_data(rows: Vec<VendorBrandAggregate>) -> EtlResult<Vec<VendorSalesSummary>> {
    let cleaned = rows.into_iter().map(clean_row).collect::<EtlResult<Vec<_>>>()?;
    debug!("Cleaned {} summary rows", cleaned.len());
    Ok(cleaned)
}

fn clean_row(row: VendorBrandAggregate) -> EtlResult<VendorSalesSummary> {
    // A parsed NaN is a missing value and gets the same fill as null.
    let volume = match &row.volume {
        Some(cell) => Some(coerce_float(cell).ok_or_else(|| EtlError::DataQuality {
            column: "Volume",
            vendor: display_key(row.vendor_number),
            brand: display_key(row.brand),
            value: cell.to_string(),
        })?)
        .filter(|v| !v.is_nan()),
        None => None,
    };

    Ok(VendorSalesSummary {
        vendor_number: row.vendor_number.unwrap_or(0),
        vendor_name: fill_text(row.vendor_name),
        brand: row.brand.unwrap_or(0),
        description: fill_text(row.description),
        purchase_price: row.purchase_price.unwrap_or(0.0),
        actual_price: row.actual_price.unwrap_or(0.0),
        volume: volume.unwrap_or(0.0),
        total_purchase_quantity: row.total_purchase_quantity.unwrap_or(0.0),
        total_purchase_dollars: row.total_purchase_dollars.unwrap_or(0.0),
        total_sales_quantity: row.total_sales_quantity.unwrap_or(0.0),
        total_sales_dollars: row.total_sales_dollars.unwrap_or(0.0),
        total_sales_price: row.total_sales_price.unwrap_or(0.0),
        total_excise_tax: row.total_excise_tax.unwrap_or(0.0),
        freight_cost: row.freight_cost.unwrap_or(0.0),
    })
}

/// Convert a cell to a float, `None` if it is not numeric.
///
/// Text is parsed after trimming surrounding whitespace. `"nan"`, `"inf"`
/// and `"infinity"` parse in any case; an empty string does not.
pub fn coerce_float(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Integer(i) => Some(*i as f64),
        RawCell::Real(f) => Some(*f),
        RawCell::Text(s) => s.trim().parse::<f64>().ok(),
    }
}

fn fill_text(value: Option<String>) -> String {
    match value {
        Some(s) => s.trim().to_string(),
        None => TEXT_FILL.to_string(),
    }
}

fn display_key(key: Option<i64>) -> String {
    key.map(|k| k.to_string()).unwrap_or_else(|| "NULL".to_string())
}
