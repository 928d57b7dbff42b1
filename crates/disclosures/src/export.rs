//! Export of finished trade tables.

use disclosures_core::{DisclosureError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

#[cfg(feature = "export-sqlite")]
use rusqlite::{Connection, params_from_iter};

/// Writes a trade table to a CSV file, header included.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DisclosureError::Export(e.to_string()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .map_err(|e| DisclosureError::Export(e.to_string()))?;
    debug!(path = %path.display(), rows = df.height(), "trade table written to csv");
    Ok(())
}

/// Writes a trade table to a SQLite database, replacing `table` if it
/// already exists. Every column is stored as TEXT.
///
/// # Errors
/// Returns an error if the database cannot be opened, a column is not a
/// string column, or an insert fails.
#[cfg(feature = "export-sqlite")]
pub fn write_sqlite(df: &DataFrame, path: impl AsRef<Path>, table: &str) -> Result<()> {
    let conn =
        Connection::open(path.as_ref()).map_err(|e| DisclosureError::Export(e.to_string()))?;
    write_table(&conn, df, table)
}

#[cfg(feature = "export-sqlite")]
fn write_table(conn: &Connection, df: &DataFrame, table: &str) -> Result<()> {
    let names = df.get_column_names_str();
    let schema = names
        .iter()
        .map(|name| format!("\"{}\" TEXT", name))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS \"{}\"; CREATE TABLE \"{}\" ({});",
        table, table, schema
    ))
    .map_err(|e| DisclosureError::Export(e.to_string()))?;

    let columns = df
        .get_columns()
        .iter()
        .map(|column| column.str().map_err(|e| DisclosureError::Export(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    let quoted = names
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=names.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    let insert = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        table, quoted, placeholders
    );

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| DisclosureError::Export(e.to_string()))?;
    {
        let mut stmt = tx
            .prepare(&insert)
            .map_err(|e| DisclosureError::Export(e.to_string()))?;
        for i in 0..df.height() {
            let row: Vec<&str> = columns.iter().map(|c| c.get(i).unwrap_or("")).collect();
            stmt.execute(params_from_iter(row))
                .map_err(|e| DisclosureError::Export(e.to_string()))?;
        }
    }
    tx.commit().map_err(|e| DisclosureError::Export(e.to_string()))?;

    debug!(table, rows = df.height(), "trade table written to sqlite");
    Ok(())
}
