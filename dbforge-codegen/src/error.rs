//! Error types for dbforge-codegen

use thiserror::Error;

/// Result type alias for dbforge-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Failed to parse SQL schema: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] dbforge::Error),

    /// A column whose SQL type has no C# counterpart, met where a concrete type is required
    #[error("No C# type mapping for column {table}.{column} of SQL type `{sql_type}`")]
    UnmappedType {
        table: String,
        column: String,
        sql_type: String,
    },

    #[error("Catalog load failed: {0}")]
    MetadataError(String),
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
