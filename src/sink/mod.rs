//! Persistence of the enriched summary.
//!
//! A sink takes a relation and a table name and stores it. The SQLite sink
//! writes back into the inventory database; the CSV sink exports a file.

pub mod export;
pub mod sqlite;

pub use export::CsvSink;
pub use sqlite::SqliteSink;

use crate::error::{EtlError, EtlResult};
use crate::inventory::REQUIRED_COLUMNS;
use crate::models::VendorSalesSummary;

/// Output columns and their SQLite types, in write order.
pub const OUTPUT_COLUMNS: &[(&str, &str)] = &[
    ("VendorNumber", "INTEGER"),
    ("VendorName", "TEXT"),
    ("Brand", "INTEGER"),
    ("Description", "TEXT"),
    ("PurchasePrice", "REAL"),
    ("ActualPrice", "REAL"),
    ("Volume", "REAL"),
    ("TotalPurchaseQuantity", "REAL"),
    ("TotalPurchaseDollars", "REAL"),
    ("TotalSalesQuantity", "REAL"),
    ("TotalSalesDollars", "REAL"),
    ("TotalSalesPrice", "REAL"),
    ("TotalExciseTax", "REAL"),
    ("FreightCost", "REAL"),
    ("GrossProfit", "REAL"),
    ("ProfitMargin", "REAL"),
    ("StockTurnover", "REAL"),
    ("SalesToPurchaseRatio", "REAL"),
];

/// Something that can durably store the summary relation.
pub trait SummarySink {
    /// Store `rows` under `table`, returning the number of rows written.
    fn ingest(&mut self, table: &str, rows: &[VendorSalesSummary]) -> EtlResult<usize>;
}

/// Accept only plain identifiers: ASCII letters, digits and underscores,
/// not starting with a digit.
pub fn validate_table_name(name: &str) -> EtlResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid && !name.to_ascii_lowercase().starts_with("sqlite_") {
        Ok(())
    } else {
        Err(EtlError::InvalidTable(name.to_string()))
    }
}

/// A table name the SQLite sink may write: a plain identifier that is not
/// one of the inventory tables the summary is read from.
pub fn validate_output_table(name: &str) -> EtlResult<()> {
    validate_table_name(name)?;

    if REQUIRED_COLUMNS
        .iter()
        .any(|(table, _)| table.eq_ignore_ascii_case(name))
    {
        return Err(EtlError::SourceTable(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_table_names() {
        assert!(validate_table_name("vendor_sales_summary").is_ok());
        assert!(validate_table_name("_staging2").is_ok());
        assert!(validate_table_name("Summary").is_ok());
    }

    #[test]
    fn test_invalid_table_names() {
        for name in [
            "",
            "2024_summary",
            "vendor summary",
            "summary;DROP TABLE sales",
            "\"quoted\"",
            "sqlite_master",
        ] {
            assert!(
                matches!(validate_table_name(name), Err(EtlError::InvalidTable(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_output_table_refuses_source_tables() {
        for name in ["purchases", "purchase_prices", "sales", "vendor_invoice", "SALES"] {
            assert!(
                matches!(validate_output_table(name), Err(EtlError::SourceTable(_))),
                "{name:?} should be refused"
            );
        }
        assert!(validate_output_table("vendor_sales_summary").is_ok());
        assert!(validate_output_table("sales_summary").is_ok());
        assert!(matches!(
            validate_output_table("bad name"),
            Err(EtlError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_output_columns_match_record_fields() {
        let record = crate::models::SummaryRecord {
            vendor_number: 1,
            vendor_name: String::new(),
            brand: 2,
            description: String::new(),
            purchase_price: 0.0,
            actual_price: 0.0,
            volume: 0.0,
            total_purchase_quantity: 0.0,
            total_purchase_dollars: 0.0,
            total_sales_quantity: 0.0,
            total_sales_dollars: 0.0,
            total_sales_price: 0.0,
            total_excise_tax: 0.0,
            freight_cost: 0.0,
            gross_profit: 0.0,
            profit_margin: 0.0,
            stock_turnover: 0.0,
            sales_to_purchase_ratio: 0.0,
        };
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), OUTPUT_COLUMNS.len());
        for (name, _) in OUTPUT_COLUMNS {
            assert!(object.contains_key(*name), "missing {name}");
        }
    }
}
