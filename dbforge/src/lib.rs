//! dbforge - SQL Server data access helper
//!
//! A thin layer over `tiberius` that executes ad hoc T-SQL or stored
//! procedures and maps result rows onto Rust structs through derive macros.
//! It backs both the code generator's catalog loading and applications that
//! call the generated stored procedures.
//!
//! # Features
//!
//! - **Query API**: `.bind()` for positional `@P1..` parameters, `.param()` for named ones
//! - **Return values**: every call carries a reserved `@RETURN_VALUE` parameter
//! - **Derive Macros**: `#[derive(FromRow)]` and `#[derive(DbEnum)]`
//! - **Strict mapping**: optionally reject result columns no field binds to
//! - **Scoped connections**: one connection per call, always closed afterwards
//!
//! # Example
//!
//! ```ignore
//! use dbforge::{Database, FromRow, Query, SqlServerDatabase};
//!
//! #[derive(FromRow)]
//! pub struct Game {
//!     #[dbforge(rename = "Id")]
//!     pub id: i32,
//!     #[dbforge(rename = "Name")]
//!     pub name: String,
//! }
//!
//! async fn load_games(db: &SqlServerDatabase) -> dbforge::Result<Vec<Game>> {
//!     Query::procedure("[dbo].[Game_SelectAll]").fetch_all(db).await
//! }
//! ```

// Lets the derive macros' `::dbforge::` paths resolve inside this crate's tests
extern crate self as dbforge;

pub mod error;
pub mod mssql;
pub mod query;
pub mod table;
pub mod traits;
pub mod value;

// Re-export the derive macros
pub use dbforge_derive::{DbEnum, FromRow};

// Re-export main types
pub use error::{Error, Result};
pub use mssql::SqlServerDatabase;
pub use query::{
    CommandKind, Parameter, ParameterDirection, Parameters, Query, RETURN_VALUE_PARAMETER,
};
pub use table::{DataRow, DataTable, MappingMode};
pub use traits::{Database, ExecuteResult, FromRow, FromValue, Row, RowExt, ToValue};
pub use value::Value;
