//! Error types for the summary pipeline.
//!
//! Database, transform and export stages return [`EtlError`]; the
//! application layer wraps it with `anyhow` context.

use thiserror::Error;

/// Errors raised while building or persisting the vendor summary.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The data source is unreachable, or a table, column or statement failed.
    #[error("data access error: {context}: {source}")]
    DataAccess {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Tables or columns the aggregation query depends on are absent.
    #[error("data access error: missing schema objects: {}", .missing.join(", "))]
    MissingSchema { missing: Vec<String> },

    /// The database file does not exist.
    #[error("data access error: database not found: {0}")]
    DatabaseNotFound(String),

    /// A value could not be coerced to the expected numeric type.
    #[error("data quality error: {column} for vendor {vendor}, brand {brand}: cannot convert {value:?} to a number")]
    DataQuality {
        column: &'static str,
        vendor: String,
        brand: String,
        value: String,
    },

    /// The output table name is not a plain SQL identifier.
    #[error("invalid table name {0:?}: use ASCII letters, digits and underscores, not starting with a digit")]
    InvalidTable(String),

    /// The output table would overwrite one of the inventory tables.
    #[error("refusing to write the summary into source table {0:?}")]
    SourceTable(String),

    /// Writing an export file failed.
    #[error("export error: {0}")]
    Export(#[from] csv::Error),
}

impl EtlError {
    /// Wrap a rusqlite error with a short description of what was attempted.
    pub fn access(context: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> Self {
        let context = context.into();
        move |source| EtlError::DataAccess { context, source }
    }
}

pub type EtlResult<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_schema_message_lists_objects() {
        let err = EtlError::MissingSchema {
            missing: vec!["sales".to_string(), "purchases.Dollars".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("sales, purchases.Dollars"));
        assert!(msg.starts_with("data access error"));
    }

    #[test]
    fn test_data_quality_message() {
        let err = EtlError::DataQuality {
            column: "Volume",
            vendor: "7".to_string(),
            brand: "42".to_string(),
            value: "1.75L".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("data quality error"));
        assert!(msg.contains("\"1.75L\""));
        assert!(msg.contains("brand 42"));
    }

    #[test]
    fn test_source_table_message() {
        let err = EtlError::SourceTable("sales".to_string());
        assert!(err.to_string().contains("source table \"sales\""));
    }
}
