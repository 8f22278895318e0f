//! Test fixtures: an in-memory inventory database with helper inserts.

use rusqlite::{params, Connection};

pub const INVENTORY_SCHEMA: &str = "
    CREATE TABLE purchases (
        VendorNumber INTEGER,
        VendorName TEXT,
        Brand INTEGER,
        Description TEXT,
        PurchasePrice REAL,
        Quantity INTEGER,
        Dollars REAL
    );
    CREATE TABLE purchase_prices (
        Brand INTEGER,
        Price REAL,
        Volume TEXT
    );
    CREATE TABLE sales (
        VendorNo INTEGER,
        Brand INTEGER,
        SalesQuantity INTEGER,
        SalesDollars REAL,
        SalesPrice REAL,
        ExciseTax REAL
    );
    CREATE TABLE vendor_invoice (
        VendorNumber INTEGER,
        Freight REAL
    );
";

/// Open an in-memory database with the inventory tables created and empty.
pub fn inventory_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(INVENTORY_SCHEMA).unwrap();
    conn
}

#[allow(clippy::too_many_arguments)]
pub fn add_purchase(
    conn: &Connection,
    vendor: i64,
    vendor_name: &str,
    brand: i64,
    description: &str,
    purchase_price: f64,
    quantity: i64,
    dollars: f64,
) {
    conn.execute(
        "INSERT INTO purchases VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![vendor, vendor_name, brand, description, purchase_price, quantity, dollars],
    )
    .unwrap();
}

pub fn add_price(conn: &Connection, brand: i64, price: f64, volume: &str) {
    conn.execute(
        "INSERT INTO purchase_prices VALUES (?1, ?2, ?3)",
        params![brand, price, volume],
    )
    .unwrap();
}

pub fn add_sale(
    conn: &Connection,
    vendor: i64,
    brand: i64,
    quantity: i64,
    dollars: f64,
    price: f64,
    excise_tax: f64,
) {
    conn.execute(
        "INSERT INTO sales VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![vendor, brand, quantity, dollars, price, excise_tax],
    )
    .unwrap();
}

pub fn add_freight(conn: &Connection, vendor: i64, freight: f64) {
    conn.execute(
        "INSERT INTO vendor_invoice VALUES (?1, ?2)",
        params![vendor, freight],
    )
    .unwrap();
}

/// A small inventory with two vendors, three brands and one unsold brand.
pub fn sample_inventory() -> Connection {
    let conn = inventory_db();

    add_price(&conn, 100, 12.99, "750");
    add_price(&conn, 200, 24.99, "1750");
    add_price(&conn, 300, 8.49, "375");

    add_purchase(&conn, 1, "ACME SPIRITS   ", 100, "Test Vodka ", 9.0, 10, 90.0);
    add_purchase(&conn, 1, "ACME SPIRITS   ", 100, "Test Vodka ", 9.0, 5, 45.0);
    add_purchase(&conn, 1, "ACME SPIRITS   ", 200, "  Test Gin", 18.0, 4, 72.0);
    add_purchase(&conn, 2, "BLUE RIVER WINES", 300, "House Red", 6.0, 20, 120.0);
    // Promotional rows carry no cost and are excluded.
    add_purchase(&conn, 2, "BLUE RIVER WINES", 300, "House Red", 0.0, 50, 0.0);

    add_sale(&conn, 1, 100, 8, 103.92, 12.99, 0.84);
    add_sale(&conn, 1, 100, 4, 51.96, 12.99, 0.42);
    add_sale(&conn, 2, 300, 12, 101.88, 8.49, 1.1);

    add_freight(&conn, 1, 10.5);
    add_freight(&conn, 1, 4.5);
    add_freight(&conn, 2, 7.25);

    conn
}
