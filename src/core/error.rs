/// Error Module
///
/// This module defines the single error type surfaced by every database
/// access operation. Driver errors are folded into it with their original
/// message preserved.
use thiserror::Error;

/// Error type for the access layer.
///
/// This enum covers every failure an operation can report:
/// - Connection setup (bad path, unsupported driver or charset)
/// - Statement preparation and execution (bad SQL, constraint violations)
/// - Payload preconditions (missing key, empty data, invalid identifiers)
/// - The table-existence guard
/// - Configuration loading and output encoding
#[derive(Error, Debug)]
pub enum DbError {
    /// Opening or configuring the connection failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Preparing, binding or executing a statement failed
    #[error("Statement error: {0}")]
    Statement(#[from] rusqlite::Error),

    /// An update payload does not carry the column used in the WHERE clause
    #[error("Unable to update {table}: data does not contain {key}")]
    MissingKey { table: String, key: String },

    /// The table-existence guard rejected the target table
    #[error("{0} does not exist")]
    TableNotFound(String),

    /// A table or column name is not a plain SQL identifier
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A write payload has no columns to write
    #[error("Nothing to write to {0}: data is empty")]
    EmptyData(String),

    /// Bound parameters could not be applied to the statement
    #[error("Parameter error: {0}")]
    Params(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result to use DbError as the error type.
pub type Result<T> = std::result::Result<T, DbError>;
