//! FromRow trait for mapping database rows to Rust structs

use crate::error::{Error, Result};
use crate::traits::FromValue;
use crate::value::Value;

/// A database row that can be queried by column name.
///
/// Implemented by [`DataRow`](crate::DataRow); lets the same `FromRow`
/// implementations work against live results and hand-built tables.
pub trait Row {
    /// Get a value from the row by column name as a dynamic Value.
    ///
    /// Returns an error if the column doesn't exist.
    fn get_value(&self, column: &str) -> Result<Value>;

    /// Whether the row has a column with this name.
    fn has_column(&self, column: &str) -> bool {
        self.get_value(column).is_ok()
    }
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value from the row by column name.
    ///
    /// A `NULL` for a non-nullable target is [`Error::UnexpectedNull`];
    /// other conversion failures are wrapped with the column name.
    fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_value(column)?;
        if value.is_null() && !T::NULLABLE {
            return Err(Error::UnexpectedNull(column.to_string()));
        }
        T::from_value(value).map_err(|e| Error::ColumnDecode {
            column: column.to_string(),
            source: Box::new(e),
        })
    }

    /// Like [`get`](RowExt::get), but a missing column yields `None`.
    fn get_opt<T: FromValue>(&self, column: &str) -> Result<Option<T>> {
        if self.has_column(column) {
            self.get(column).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Like [`get`](RowExt::get), but a missing column or a `NULL` yields
    /// `T::default()`.
    fn get_or_default<T: FromValue + Default>(&self, column: &str) -> Result<T> {
        Ok(self
            .get_opt::<Option<T>>(column)?
            .flatten()
            .unwrap_or_default())
    }
}

// Implement RowExt for all Row types
impl<R: Row + ?Sized> RowExt for R {}

/// Trait for types that can be constructed from a database row.
///
/// This trait is typically implemented via the `#[derive(FromRow)]` macro,
/// which generates the column to field binding table at compile time.
///
/// # Manual Implementation
///
/// ```ignore
/// use dbforge::{FromRow, Row, RowExt, Result};
///
/// pub struct Game {
///     pub id: i32,
///     pub name: String,
/// }
///
/// impl FromRow for Game {
///     fn from_row<R: Row>(row: &R) -> Result<Self> {
///         Ok(Self {
///             id: row.get("Id")?,
///             name: row.get("Name")?,
///         })
///     }
///
///     fn column_names() -> &'static [&'static str] {
///         &["Id", "Name"]
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Construct an instance of this type from a database row.
    fn from_row<R: Row>(row: &R) -> Result<Self>;

    /// Get the column names that this type reads from.
    ///
    /// Strict mapping rejects any result column not in this list.
    fn column_names() -> &'static [&'static str];
}
