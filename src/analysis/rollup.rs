//! Summary statistics over the enriched rows.
//!
//! Groups brand rows by vendor and computes run totals for the report.

use crate::models::{safe_denominator, SummaryTotals, VendorRollup, VendorSalesSummary};
use std::collections::BTreeMap;

/// Group summary rows by vendor number.
pub fn group_by_vendor(rows: &[VendorSalesSummary]) -> BTreeMap<i64, Vec<&VendorSalesSummary>> {
    let mut grouped: BTreeMap<i64, Vec<&VendorSalesSummary>> = BTreeMap::new();

    for row in rows {
        grouped.entry(row.vendor_number).or_default().push(row);
    }

    grouped
}

/// Roll brand rows up to one entry per vendor.
///
/// Freight is already a vendor-level total repeated on each brand row, so
/// it is taken once rather than summed.
pub fn vendor_rollups(rows: &[VendorSalesSummary]) -> Vec<VendorRollup> {
    group_by_vendor(rows)
        .into_iter()
        .map(|(vendor_number, brands)| {
            let total_purchase_dollars: f64 = brands.iter().map(|r| r.total_purchase_dollars).sum();
            let total_sales_dollars: f64 = brands.iter().map(|r| r.total_sales_dollars).sum();
            let gross_profit = total_sales_dollars - total_purchase_dollars;

            VendorRollup {
                vendor_number,
                vendor_name: brands[0].vendor_name.clone(),
                brands: brands.len(),
                total_purchase_dollars,
                total_sales_dollars,
                gross_profit,
                profit_margin: gross_profit / safe_denominator(total_sales_dollars) * 100.0,
                freight_cost: brands[0].freight_cost,
            }
        })
        .collect()
}

/// Get the top N vendors by gross profit.
pub fn top_vendors(rows: &[VendorSalesSummary], n: usize) -> Vec<VendorRollup> {
    let mut rollups = vendor_rollups(rows);
    rollups.sort_by(|a, b| {
        b.gross_profit
            .partial_cmp(&a.gross_profit)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.vendor_number.cmp(&b.vendor_number))
    });
    rollups.truncate(n);
    rollups
}

/// Compute totals across all rows.
pub fn summary_totals(rows: &[VendorSalesSummary]) -> SummaryTotals {
    let rollups = vendor_rollups(rows);

    let total_purchase_dollars: f64 = rows.iter().map(|r| r.total_purchase_dollars).sum();
    let total_sales_dollars: f64 = rows.iter().map(|r| r.total_sales_dollars).sum();
    let gross_profit = total_sales_dollars - total_purchase_dollars;

    SummaryTotals {
        rows: rows.len(),
        vendors: rollups.len(),
        total_purchase_dollars,
        total_sales_dollars,
        gross_profit,
        profit_margin: gross_profit / safe_denominator(total_sales_dollars) * 100.0,
        freight_cost: rollups.iter().map(|v| v.freight_cost).sum(),
        unsold_rows: rows
            .iter()
            .filter(|r| r.total_sales_quantity == 0.0 && r.total_sales_dollars == 0.0)
            .count(),
    }
}
