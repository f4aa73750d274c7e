//! Schema metadata model and catalog loading

pub mod catalog;
mod column;
mod constraint;
mod database;
mod sql_type;
mod table;

pub use column::{clean_default_value, SqlColumn};
pub use constraint::SqlConstraint;
pub use database::SqlDatabase;
pub use sql_type::{BaseType, SqlDataType};
pub use table::SqlTable;
