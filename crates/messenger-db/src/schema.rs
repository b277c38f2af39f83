use rusqlite::Connection;
use tracing::debug;

/// Create the message table and its lookup index if they do not exist yet.
///
/// Both statements run in one transaction, so a failure leaves no table
/// behind rather than a table without its index.
pub fn ensure(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    let ident = quote_ident(table);
    let index = quote_ident(&format!("idx_{table}_recipient_timestamp"));

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {ident} (
            id              TEXT NOT NULL PRIMARY KEY,
            recipient_id    TEXT NOT NULL,
            timestamp       REAL NOT NULL,
            sender_id       TEXT NOT NULL,
            message         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS {index}
            ON {ident}(recipient_id, timestamp);
        "
    ))?;
    tx.commit()?;

    debug!("Schema ready for table {}", table);
    Ok(())
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
