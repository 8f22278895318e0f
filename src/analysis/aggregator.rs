//! Vendor and brand aggregation.
//!
//! Runs the summary query that joins purchases, sales and freight into
//! one row per (vendor, brand) pair.

use crate::error::{EtlError, EtlResult};
use crate::models::{RawCell, VendorBrandAggregate};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use tracing::debug;

/// Freight is summed per vendor and joined on vendor only, so every brand
/// row of a vendor carries the same freight total.
pub const VENDOR_SUMMARY_QUERY: &str = "
WITH FreightSummary AS (
    SELECT
        VendorNumber,
        SUM(Freight) AS FreightCost
    FROM vendor_invoice
    GROUP BY VendorNumber
),
PurchaseSummary AS (
    SELECT
        p.VendorNumber,
        p.VendorName,
        p.Brand,
        p.Description,
        p.PurchasePrice,
        pp.Price AS ActualPrice,
        pp.Volume,
        SUM(p.Quantity) AS TotalPurchaseQuantity,
        SUM(p.Dollars) AS TotalPurchaseDollars
    FROM purchases p
    JOIN purchase_prices pp
        ON p.Brand = pp.Brand
    WHERE p.PurchasePrice > 0
    GROUP BY
        p.VendorNumber, p.VendorName, p.Brand, p.Description,
        p.PurchasePrice, pp.Price, pp.Volume
),
SalesSummary AS (
    SELECT
        VendorNo,
        Brand,
        SUM(SalesQuantity) AS TotalSalesQuantity,
        SUM(SalesDollars) AS TotalSalesDollars,
        SUM(SalesPrice) AS TotalSalesPrice,
        SUM(ExciseTax) AS TotalExciseTax
    FROM sales
    GROUP BY VendorNo, Brand
)
SELECT
    ps.VendorNumber,
    ps.VendorName,
    ps.Brand,
    ps.Description,
    ps.PurchasePrice,
    ps.ActualPrice,
    ps.Volume,
    ps.TotalPurchaseQuantity,
    ps.TotalPurchaseDollars,
    ss.TotalSalesQuantity,
    ss.TotalSalesDollars,
    ss.TotalSalesPrice,
    ss.TotalExciseTax,
    fs.FreightCost
FROM PurchaseSummary ps
LEFT JOIN SalesSummary ss
    ON ps.VendorNumber = ss.VendorNo
    AND ps.Brand = ss.Brand
LEFT JOIN FreightSummary fs
    ON ps.VendorNumber = fs.VendorNumber
ORDER BY ps.TotalPurchaseDollars DESC
";

/// Build the per-(vendor, brand) summary from the inventory tables.
///
/// Rows are ordered by total purchase dollars, highest first. Sales and
/// freight columns are `None` where the left joins found no match.
pub fn create_vendor_summary(conn: &Connection) -> EtlResult<Vec<VendorBrandAggregate>> {
    let mut stmt = conn
        .prepare(VENDOR_SUMMARY_QUERY)
        .map_err(EtlError::access("preparing vendor summary query"))?;

    let rows = stmt
        .query_map([], read_aggregate)
        .map_err(EtlError::access("running vendor summary query"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(EtlError::access("reading vendor summary rows"))?
        .into_iter()
        .collect::<EtlResult<Vec<_>>>()?;

    debug!("Vendor summary query returned {} rows", rows.len());

    Ok(rows)
}

/// The outer result carries SQLite failures, the inner one id values that
/// are not whole numbers.
fn read_aggregate(row: &Row<'_>) -> rusqlite::Result<EtlResult<VendorBrandAggregate>> {
    let vendor_cell = raw_cell(row.get_ref(0)?);
    let brand_cell = raw_cell(row.get_ref(2)?);
    let (vendor_number, brand) = match id_pair(vendor_cell, brand_cell) {
        Ok(ids) => ids,
        Err(err) => return Ok(Err(err)),
    };

    Ok(Ok(VendorBrandAggregate {
        vendor_number,
        vendor_name: row.get(1)?,
        brand,
        description: row.get(3)?,
        purchase_price: row.get(4)?,
        actual_price: row.get(5)?,
        volume: raw_cell(row.get_ref(6)?),
        total_purchase_quantity: row.get(7)?,
        total_purchase_dollars: row.get(8)?,
        total_sales_quantity: row.get(9)?,
        total_sales_dollars: row.get(10)?,
        total_sales_price: row.get(11)?,
        total_excise_tax: row.get(12)?,
        freight_cost: row.get(13)?,
    }))
}

/// Id columns may come back as REAL when the loader widened them; whole
/// values are accepted as integers.
fn id_pair(
    vendor: Option<RawCell>,
    brand: Option<RawCell>,
) -> EtlResult<(Option<i64>, Option<i64>)> {
    let quality_error = |column: &'static str, value: &RawCell| EtlError::DataQuality {
        column,
        vendor: display_cell(vendor.as_ref()),
        brand: display_cell(brand.as_ref()),
        value: value.to_string(),
    };

    let vendor_number = vendor
        .as_ref()
        .map(|cell| whole_number(cell).ok_or_else(|| quality_error("VendorNumber", cell)))
        .transpose()?;
    let brand_id = brand
        .as_ref()
        .map(|cell| whole_number(cell).ok_or_else(|| quality_error("Brand", cell)))
        .transpose()?;

    Ok((vendor_number, brand_id))
}

fn whole_number(cell: &RawCell) -> Option<i64> {
    match cell {
        RawCell::Integer(i) => Some(*i),
        RawCell::Real(f)
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
        {
            Some(*f as i64)
        }
        _ => None,
    }
}

fn display_cell(cell: Option<&RawCell>) -> String {
    cell.map_or_else(|| "NULL".to_string(), ToString::to_string)
}

/// Keep a loosely typed cell as-is so coercion can report what it found.
fn raw_cell(value: ValueRef<'_>) -> Option<RawCell> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(RawCell::Integer(i)),
        ValueRef::Real(f) => Some(RawCell::Real(f)),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Some(RawCell::Text(String::from_utf8_lossy(t).into_owned()))
        }
    }
}
