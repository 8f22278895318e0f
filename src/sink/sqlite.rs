//! SQLite table sink.

use super::{validate_output_table, SummarySink, OUTPUT_COLUMNS};
use crate::error::{EtlError, EtlResult};
use crate::models::{IfExists, VendorSalesSummary};
use rusqlite::{params, Connection};
use tracing::{debug, info};

/// Writes the summary into a table of an open SQLite connection.
///
/// The whole write is one transaction: a failure leaves any previous
/// contents of the table untouched.
pub struct SqliteSink<'c> {
    conn: &'c Connection,
    if_exists: IfExists,
}

impl<'c> SqliteSink<'c> {
    pub fn new(conn: &'c Connection, if_exists: IfExists) -> Self {
        Self { conn, if_exists }
    }
}

impl SummarySink for SqliteSink<'_> {
    fn ingest(&mut self, table: &str, rows: &[VendorSalesSummary]) -> EtlResult<usize> {
        validate_output_table(table)?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(EtlError::access("starting ingest transaction"))?;

        if self.if_exists == IfExists::Replace {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{}\"", table))
                .map_err(EtlError::access(format!("dropping table {}", table)))?;
        }
        tx.execute_batch(&create_table_sql(table))
            .map_err(EtlError::access(format!("creating table {}", table)))?;

        {
            let mut stmt = tx
                .prepare(&insert_sql(table))
                .map_err(EtlError::access(format!("preparing insert into {}", table)))?;

            for row in rows {
                stmt.execute(params![
                    row.vendor_number,
                    row.vendor_name,
                    row.brand,
                    row.description,
                    row.purchase_price,
                    row.actual_price,
                    row.volume,
                    row.total_purchase_quantity,
                    row.total_purchase_dollars,
                    row.total_sales_quantity,
                    row.total_sales_dollars,
                    row.total_sales_price,
                    row.total_excise_tax,
                    row.freight_cost,
                    row.gross_profit(),
                    row.profit_margin(),
                    row.stock_turnover(),
                    row.sales_to_purchase_ratio(),
                ])
                .map_err(EtlError::access(format!("inserting into {}", table)))?;
            }
        }

        tx.commit()
            .map_err(EtlError::access(format!("committing {}", table)))?;

        info!(
            "Ingested {} rows into {} ({})",
            rows.len(),
            table,
            self.if_exists
        );
        Ok(rows.len())
    }
}

fn create_table_sql(table: &str) -> String {
    let columns = OUTPUT_COLUMNS
        .iter()
        .map(|(name, ty)| format!("\"{}\" {}", name, ty))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS \"{}\" ({})", table, columns)
}

fn insert_sql(table: &str) -> String {
    let names = OUTPUT_COLUMNS
        .iter()
        .map(|(name, _)| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=OUTPUT_COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("INSERT INTO \"{}\" ({}) VALUES ({})", table, names, placeholders);
    debug!("Insert statement: {}", sql);
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{inventory_db, sample_inventory};

    fn summary(vendor: i64, brand: i64, purchase: f64, sales: f64) -> VendorSalesSummary {
        VendorSalesSummary {
            vendor_number: vendor,
            vendor_name: "ACME".to_string(),
            brand,
            description: "Vodka".to_string(),
            purchase_price: 5.0,
            actual_price: 7.0,
            volume: 750.0,
            total_purchase_quantity: 10.0,
            total_purchase_dollars: purchase,
            total_sales_quantity: 0.0,
            total_sales_dollars: sales,
            total_sales_price: 0.0,
            total_excise_tax: 0.0,
            freight_cost: 3.0,
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_ingest_writes_derived_columns() {
        let conn = inventory_db();
        let mut sink = SqliteSink::new(&conn, IfExists::Replace);

        let written = sink
            .ingest("vendor_sales_summary", &[summary(1, 100, 50.0, 0.0)])
            .unwrap();
        assert_eq!(written, 1);

        let (gross, margin, turnover): (f64, f64, f64) = conn
            .query_row(
                "SELECT GrossProfit, ProfitMargin, StockTurnover FROM vendor_sales_summary",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(gross, -50.0);
        assert_eq!(margin, -5000.0);
        assert_eq!(turnover, 0.0);
    }

    #[test]
    fn test_replace_overwrites_previous_rows() {
        let conn = inventory_db();
        let mut sink = SqliteSink::new(&conn, IfExists::Replace);

        sink.ingest("summary", &[summary(1, 1, 1.0, 0.0), summary(1, 2, 1.0, 0.0)])
            .unwrap();
        sink.ingest("summary", &[summary(2, 3, 1.0, 0.0)]).unwrap();

        assert_eq!(count(&conn, "summary"), 1);
    }

    #[test]
    fn test_append_keeps_previous_rows() {
        let conn = inventory_db();
        let mut sink = SqliteSink::new(&conn, IfExists::Append);

        sink.ingest("summary", &[summary(1, 1, 1.0, 0.0)]).unwrap();
        sink.ingest("summary", &[summary(2, 3, 1.0, 0.0)]).unwrap();

        assert_eq!(count(&conn, "summary"), 2);
    }

    #[test]
    fn test_empty_relation_creates_empty_table() {
        let conn = inventory_db();
        let mut sink = SqliteSink::new(&conn, IfExists::Replace);

        assert_eq!(sink.ingest("summary", &[]).unwrap(), 0);
        assert_eq!(count(&conn, "summary"), 0);
    }

    #[test]
    fn test_invalid_table_rejected_before_write() {
        let conn = inventory_db();
        let mut sink = SqliteSink::new(&conn, IfExists::Replace);

        let err = sink
            .ingest("sales; DROP TABLE purchases", &[summary(1, 1, 1.0, 0.0)])
            .unwrap_err();
        assert!(matches!(err, EtlError::InvalidTable(_)));
        assert_eq!(count(&conn, "purchases"), 0);
        assert_eq!(count(&conn, "sales"), 0);
    }

    #[test]
    fn test_source_table_never_replaced() {
        let conn = sample_inventory();
        let mut sink = SqliteSink::new(&conn, IfExists::Replace);

        for table in ["sales", "Purchases"] {
            let err = sink
                .ingest(table, &[summary(1, 1, 1.0, 0.0)])
                .unwrap_err();
            assert!(matches!(err, EtlError::SourceTable(_)));
        }
        assert_eq!(count(&conn, "sales"), 3);
        assert_eq!(count(&conn, "purchases"), 5);
        assert!(crate::inventory::missing_schema_objects(&conn)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_failed_append_leaves_table_intact() {
        let conn = inventory_db();
        conn.execute_batch("CREATE TABLE summary (Other TEXT); INSERT INTO summary VALUES ('x');")
            .unwrap();

        let mut sink = SqliteSink::new(&conn, IfExists::Append);
        let err = sink
            .ingest("summary", &[summary(1, 1, 1.0, 0.0)])
            .unwrap_err();

        assert!(matches!(err, EtlError::DataAccess { .. }));
        assert_eq!(count(&conn, "summary"), 1);
    }
}
