//! Inventory database access.
//!
//! Owns the single connection used for a run and checks that the tables
//! the summary query reads are present before anything else touches them.

use crate::error::{EtlError, EtlResult};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tables and columns the aggregation query depends on.
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "purchases",
        &[
            "VendorNumber",
            "VendorName",
            "Brand",
            "Description",
            "PurchasePrice",
            "Quantity",
            "Dollars",
        ],
    ),
    ("purchase_prices", &["Brand", "Price", "Volume"]),
    (
        "sales",
        &[
            "VendorNo",
            "Brand",
            "SalesQuantity",
            "SalesDollars",
            "SalesPrice",
            "ExciseTax",
        ],
    ),
    ("vendor_invoice", &["VendorNumber", "Freight"]),
];

/// An open inventory database.
///
/// The connection is released when this value is dropped, whether the run
/// succeeded or not.
pub struct Inventory {
    conn: Connection,
    path: PathBuf,
}

impl Inventory {
    /// Open an existing inventory database for reading and writing.
    ///
    /// A missing file is an error; the database is never created here.
    pub fn open(path: &Path) -> EtlResult<Self> {
        if !path.exists() {
            return Err(EtlError::DatabaseNotFound(path.display().to_string()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(EtlError::access(format!("opening {}", path.display())))?;

        info!("Opened inventory database: {}", path.display());

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Wrap an already open connection.
    #[cfg(test)]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            path: PathBuf::from(":memory:"),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check that every required table and column exists.
    pub fn verify_schema(&self) -> EtlResult<()> {
        let missing = missing_schema_objects(&self.conn)?;

        if missing.is_empty() {
            debug!("Inventory schema verified");
            Ok(())
        } else {
            Err(EtlError::MissingSchema { missing })
        }
    }

    /// Close the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> EtlResult<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, e)| EtlError::access(format!("closing {}", path.display()))(e))?;
        debug!("Closed inventory database: {}", path.display());
        Ok(())
    }
}

/// List required tables and columns absent from the database.
///
/// A missing table is reported once by name; missing columns are reported
/// as `table.column`.
pub fn missing_schema_objects(conn: &Connection) -> EtlResult<Vec<String>> {
    let mut missing = Vec::new();

    for (table, columns) in REQUIRED_COLUMNS {
        let present = table_columns(conn, table)?;

        if present.is_empty() {
            missing.push(table.to_string());
            continue;
        }

        for column in columns.iter() {
            if !present.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                missing.push(format!("{}.{}", table, column));
            }
        }
    }

    Ok(missing)
}

/// Column names of a table, empty if the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> EtlResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(EtlError::access("reading table info"))?;

    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(EtlError::access(format!("reading columns of {}", table)))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(EtlError::access(format!("reading columns of {}", table)))?;

    Ok(columns)
}
