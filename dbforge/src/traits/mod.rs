//! Core traits for dbforge

mod database;
mod from_row;
mod from_value;
mod to_value;

pub use database::{Database, ExecuteResult};
pub use from_row::{FromRow, Row, RowExt};
pub use from_value::FromValue;
pub use to_value::ToValue;
