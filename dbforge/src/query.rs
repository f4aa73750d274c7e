//! Query builder for dbforge

use crate::error::{Error, Result};
use crate::table::{DataTable, MappingMode};
use crate::traits::{Database, ExecuteResult, FromRow, FromValue, ToValue};
use crate::value::Value;

/// Name of the reserved return-value parameter.
pub const RETURN_VALUE_PARAMETER: &str = "@RETURN_VALUE";

/// How the query text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Ad hoc T-SQL batch
    Text,
    /// Name of a stored procedure
    StoredProcedure,
}

/// Direction of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDirection {
    Input,
    ReturnValue,
}

/// A named query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name including the leading `@`
    pub name: String,
    pub value: Value,
    pub direction: ParameterDirection,
}

/// Ordered parameter list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    items: Vec<Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input parameter. A missing leading `@` is added.
    pub fn push(&mut self, name: &str, value: Value) {
        self.items.push(Parameter {
            name: normalize_name(name),
            value,
            direction: ParameterDirection::Input,
        });
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        let name = normalize_name(name);
        self.items
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&name))
    }

    /// Whether a return-value parameter is already defined.
    pub fn has_return_value(&self) -> bool {
        self.items
            .iter()
            .any(|p| p.direction == ParameterDirection::ReturnValue)
    }

    /// Append the reserved `@RETURN_VALUE` parameter unless one exists.
    pub fn ensure_return_value(&mut self) {
        if !self.has_return_value() {
            self.items.push(Parameter {
                name: RETURN_VALUE_PARAMETER.to_string(),
                value: Value::Null,
                direction: ParameterDirection::ReturnValue,
            });
        }
    }

    /// Input parameters in binding order.
    pub fn inputs(&self) -> impl Iterator<Item = &Parameter> {
        self.items
            .iter()
            .filter(|p| p.direction == ParameterDirection::Input)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{}", name)
    }
}

/// A query builder that supports fluent parameter binding.
///
/// Text queries bind positionally (`@P1`, `@P2`, ...) through [`bind`](Query::bind)
/// or by name through [`param`](Query::param). Stored procedures take named
/// parameters. Every query carries the reserved `@RETURN_VALUE` parameter.
///
/// # Example
///
/// ```ignore
/// use dbforge::{Database, Query};
///
/// async fn find_game(db: &impl Database, id: i32) -> dbforge::Result<Option<Game>> {
///     Query::new("SELECT * FROM [dbo].[Game] WHERE [Id] = @P1")
///         .bind(id)
///         .fetch_optional(db)
///         .await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    sql: String,
    kind: CommandKind,
    params: Parameters,
    mode: MappingMode,
}

impl Query {
    /// Create a new text query with the given SQL.
    pub fn new(sql: impl Into<String>) -> Self {
        Self::with_kind(sql.into(), CommandKind::Text)
    }

    /// Create a stored-procedure call.
    pub fn procedure(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), CommandKind::StoredProcedure)
    }

    fn with_kind(sql: String, kind: CommandKind) -> Self {
        let mut params = Parameters::new();
        params.ensure_return_value();
        Self {
            sql,
            kind,
            params,
            mode: MappingMode::default(),
        }
    }

    /// Bind a positional value, named `@P<n>` in binding order.
    pub fn bind<T: ToValue>(mut self, value: T) -> Self {
        let name = format!("@P{}", self.params.inputs().count() + 1);
        self.params.push(&name, value.to_value());
        self
    }

    /// Bind a named value.
    pub fn param<T: ToValue>(mut self, name: &str, value: T) -> Self {
        self.params.push(name, value.to_value());
        self
    }

    /// Reject result columns that have no matching field.
    pub fn strict(mut self) -> Self {
        self.mode = MappingMode::Strict;
        self
    }

    /// Set the mapping mode explicitly.
    pub fn mapping(mut self, mode: MappingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Get the SQL text (or procedure name).
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Get the parameters, including the return-value placeholder.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn mapping_mode(&self) -> MappingMode {
        self.mode
    }

    /// Reject empty query text before any connection is opened.
    pub fn validate(&self) -> Result<()> {
        if self.sql.trim().is_empty() {
            return Err(Error::Argument("query text must not be empty".to_string()));
        }
        Ok(())
    }

    /// Execute the query and return the result.
    pub async fn execute<D: Database>(&self, db: &D) -> Result<ExecuteResult> {
        db.execute(self).await
    }

    /// Fetch the first result set as a table.
    pub async fn fetch_table<D: Database>(&self, db: &D) -> Result<DataTable> {
        db.fetch_table(self).await
    }

    /// Fetch all matching rows.
    pub async fn fetch_all<T: FromRow + Send, D: Database>(&self, db: &D) -> Result<Vec<T>> {
        db.fetch_all(self).await
    }

    /// Fetch a single optional row.
    pub async fn fetch_optional<T: FromRow + Send, D: Database>(
        &self,
        db: &D,
    ) -> Result<Option<T>> {
        db.fetch_optional(self).await
    }

    /// Fetch exactly one row.
    pub async fn fetch_one<T: FromRow + Send, D: Database>(&self, db: &D) -> Result<T> {
        db.fetch_one(self).await
    }

    /// Fetch a scalar value (first column of first row).
    pub async fn fetch_scalar<T: FromValue + Send, D: Database>(&self, db: &D) -> Result<T> {
        db.fetch_scalar(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_value_added_once() {
        let query = Query::new("SELECT 1");
        assert_eq!(query.params().len(), 1);
        let rv = query.params().get("RETURN_VALUE").unwrap();
        assert_eq!(rv.direction, ParameterDirection::ReturnValue);

        let mut params = query.params().clone();
        params.ensure_return_value();
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_positional_binding_names() {
        let query = Query::new("SELECT * FROM t WHERE a = @P1 AND b = @P2")
            .bind(1i32)
            .bind("x");
        let names: Vec<_> = query.params().inputs().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["@P1", "@P2"]);
    }

    #[test]
    fn test_named_parameters_normalized() {
        let query = Query::procedure("[dbo].[Game_SelectById]").param("Id", 3i32);
        assert_eq!(query.kind(), CommandKind::StoredProcedure);
        assert_eq!(query.params().get("@id").unwrap().value, Value::I32(3));
    }

    #[test]
    fn test_empty_sql_is_argument_error() {
        assert!(matches!(Query::new("  ").validate(), Err(Error::Argument(_))));
        assert!(Query::new("SELECT 1").validate().is_ok());
    }

    #[test]
    fn test_strict_mode() {
        assert_eq!(Query::new("x").mapping_mode(), MappingMode::Lenient);
        assert_eq!(Query::new("x").strict().mapping_mode(), MappingMode::Strict);
    }
}
