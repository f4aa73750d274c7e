//! Error types for dbforge

use thiserror::Error;

/// Result type alias for dbforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during database operations
#[derive(Error, Debug)]
pub enum Error {
    /// SQL Server (TDS) driver error
    #[error("SQL Server error: {0}")]
    Tds(#[from] tiberius::error::Error),

    /// Socket or other I/O error while connecting
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required argument was empty or malformed; raised before any I/O
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Conversion failure for a named column
    #[error("Failed to decode column `{column}`: {source}")]
    ColumnDecode {
        column: String,
        #[source]
        source: Box<Error>,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional field
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),

    /// Result column without a matching field while mapping strictly
    #[error("Column `{column}` has no matching field on {target}")]
    UnmappedColumn { column: String, target: &'static str },

    /// Wire type the reader does not know how to convert
    #[error("Unsupported SQL type {sql_type} for column `{column}`")]
    UnsupportedType { column: String, sql_type: String },

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),
}
