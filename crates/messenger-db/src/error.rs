use thiserror::Error;

/// A date string that could not be turned into a timestamp.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    Format { input: String },
    #[error("date '{input}' has no matching local time")]
    NonexistentLocalTime { input: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to table {table}: {source}")]
    ConnectionFailed {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to close connection to table {table}: {reason}")]
    CloseFailed { table: String, reason: String },
    #[error("failed to write to table {table}: {source}")]
    WriteFailed {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to read from table {table}: {source}")]
    ReadFailed {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("table {table} is not connected")]
    NotConnected { table: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
