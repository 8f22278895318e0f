//! Fixed-width previews of summary rows for log output.

use crate::models::{VendorBrandAggregate, VendorSalesSummary};

/// Maximum cell width in a preview; longer cells are truncated with `…`.
const PREVIEW_WIDTH: usize = 22;

/// Render the first `n` aggregate rows; nulls show as `NULL`.
pub fn preview_aggregates(rows: &[VendorBrandAggregate], n: usize) -> String {
    let headers = [
        "VendorNumber",
        "VendorName",
        "Brand",
        "Description",
        "Volume",
        "TotalPurchaseDollars",
        "TotalSalesDollars",
        "FreightCost",
    ];

    let body = rows
        .iter()
        .take(n)
        .map(|r| {
            vec![
                opt(r.vendor_number),
                r.vendor_name.clone().unwrap_or_else(null),
                opt(r.brand),
                r.description.clone().unwrap_or_else(null),
                r.volume.as_ref().map(|v| v.to_string()).unwrap_or_else(null),
                opt_money(r.total_purchase_dollars),
                opt_money(r.total_sales_dollars),
                opt_money(r.freight_cost),
            ]
        })
        .collect::<Vec<_>>();

    render(&headers, &body, rows.len())
}

/// Render the first `n` enriched rows including derived metrics.
pub fn preview_summaries(rows: &[VendorSalesSummary], n: usize) -> String {
    let headers = [
        "VendorNumber",
        "VendorName",
        "Brand",
        "Description",
        "TotalPurchaseDollars",
        "TotalSalesDollars",
        "GrossProfit",
        "ProfitMargin",
        "StockTurnover",
        "SalesToPurchaseRatio",
    ];

    let body = rows
        .iter()
        .take(n)
        .map(|r| {
            vec![
                r.vendor_number.to_string(),
                r.vendor_name.clone(),
                r.brand.to_string(),
                r.description.clone(),
                format!("{:.2}", r.total_purchase_dollars),
                format!("{:.2}", r.total_sales_dollars),
                format!("{:.2}", r.gross_profit()),
                format!("{:.2}", r.profit_margin()),
                format!("{:.4}", r.stock_turnover()),
                format!("{:.4}", r.sales_to_purchase_ratio()),
            ]
        })
        .collect::<Vec<_>>();

    render(&headers, &body, rows.len())
}

fn null() -> String {
    "NULL".to_string()
}

fn opt(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(null)
}

fn opt_money(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(null)
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() > PREVIEW_WIDTH {
        let mut short: String = cell.chars().take(PREVIEW_WIDTH - 1).collect();
        short.push('…');
        short
    } else {
        cell.to_string()
    }
}

fn render(headers: &[&str], body: &[Vec<String>], total: usize) -> String {
    let body: Vec<Vec<String>> = body
        .iter()
        .map(|row| row.iter().map(|c| truncate(c)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(
        headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:>w$}", h, w = *w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &body {
        lines.push(
            row.iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:>w$}", c, w = *w))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }
    lines.push(format!("[{} of {} rows]", body.len(), total));

    lines.join("\n")
}
