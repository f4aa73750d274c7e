//! Offline schema source: T-SQL DDL parsed with sqlparser-rs

mod schema_parser;

pub use schema_parser::*;
