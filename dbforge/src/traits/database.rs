//! Database trait for executing queries against a backend

use crate::error::{Error, Result};
use crate::query::Query;
use crate::table::DataTable;
use crate::traits::{FromRow, FromValue};
use async_trait::async_trait;

/// Result of a query execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    /// Number of rows affected by the query
    pub rows_affected: u64,
    /// Value of the reserved `@RETURN_VALUE` parameter (stored procedures only)
    pub return_value: Option<i32>,
}

/// Trait for database backends.
///
/// Backends implement [`execute`](Database::execute) and
/// [`fetch_table`](Database::fetch_table); the typed fetch methods are built
/// on top of [`DataTable::to_objects`].
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a non-query and return the number of affected rows.
    async fn execute(&self, query: &Query) -> Result<ExecuteResult>;

    /// Fetch the first result set as a table.
    async fn fetch_table(&self, query: &Query) -> Result<DataTable>;

    /// Fetch all rows mapped to `T`.
    async fn fetch_all<T: FromRow + Send>(&self, query: &Query) -> Result<Vec<T>> {
        let table = self.fetch_table(query).await?;
        table.to_objects(query.mapping_mode())
    }

    /// Fetch a single optional row.
    async fn fetch_optional<T: FromRow + Send>(&self, query: &Query) -> Result<Option<T>> {
        let table = self.fetch_table(query).await?;
        table.first_object(query.mapping_mode())
    }

    /// Fetch exactly one row, returning an error if not found.
    async fn fetch_one<T: FromRow + Send>(&self, query: &Query) -> Result<T> {
        self.fetch_optional(query)
            .await?
            .ok_or_else(|| Error::Query("Expected one row, found none".to_string()))
    }

    /// Fetch a scalar value (first column of first row).
    async fn fetch_scalar<T: FromValue + Send>(&self, query: &Query) -> Result<T> {
        let table = self.fetch_table(query).await?;
        table.scalar()
    }
}

#[async_trait]
impl<D: Database + ?Sized> Database for &D {
    async fn execute(&self, query: &Query) -> Result<ExecuteResult> {
        (**self).execute(query).await
    }

    async fn fetch_table(&self, query: &Query) -> Result<DataTable> {
        (**self).fetch_table(query).await
    }
}
