//! SQL Server implementation for dbforge

mod database;
mod types;

pub use database::SqlServerDatabase;
