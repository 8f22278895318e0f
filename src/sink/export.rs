//! CSV export of the summary.

use super::SummarySink;
use crate::error::{EtlError, EtlResult};
use crate::models::{IfExists, SummaryRecord, VendorSalesSummary};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::{debug, info};

/// Writes the summary to a CSV file with a header row.
///
/// In append mode an existing file gains rows without a second header.
pub struct CsvSink {
    path: PathBuf,
    if_exists: IfExists,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, if_exists: IfExists) -> Self {
        Self {
            path: path.into(),
            if_exists,
        }
    }
}

impl SummarySink for CsvSink {
    fn ingest(&mut self, table: &str, rows: &[VendorSalesSummary]) -> EtlResult<usize> {
        let appending = self.if_exists == IfExists::Append && self.path.exists();
        debug!(path = %self.path.display(), appending, "Exporting CSV");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(appending)
            .truncate(!appending)
            .open(&self.path)
            .map_err(|e| EtlError::Export(e.into()))?;

        let mut writer = WriterBuilder::new()
            .has_headers(!appending)
            .from_writer(file);

        for row in rows {
            writer.serialize(SummaryRecord::from(row))?;
        }
        writer.flush().map_err(|e| EtlError::Export(e.into()))?;

        info!(
            "Exported {} rows of {} to {}",
            rows.len(),
            table,
            self.path.display()
        );
        Ok(rows.len())
    }
}
