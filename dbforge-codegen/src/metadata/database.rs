//! Database metadata and catalog loading

use dbforge::{Database, Query};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::catalog::{self, ColumnRow, ConstraintRow, DefaultRow, ModuleRow};
use super::column::{clean_default_value, SqlColumn};
use super::constraint::SqlConstraint;
use super::table::SqlTable;
use crate::error::Result;

/// Root of the schema model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlDatabase {
    pub name: String,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub connection_string: String,
    /// Tables in catalog order
    pub tables: IndexMap<String, SqlTable>,
    /// Stored procedure and function bodies by name
    pub stored_procedures: IndexMap<String, String>,
    pub constraints: IndexMap<String, SqlConstraint>,
    /// Failures collected by the last load
    pub errors: Vec<String>,
}

impl SqlDatabase {
    pub fn new(name: &str, connection_string: &str) -> Self {
        Self {
            name: name.to_string(),
            connection_string: connection_string.to_string(),
            ..Default::default()
        }
    }

    pub fn table(&self, name: &str) -> Option<&SqlTable> {
        self.tables.get(name)
    }

    /// Add a constraint row. Rows of a multi-column key share a name, so
    /// the second and later columns are stored as `<name>_2`, `<name>_3`, ...
    pub fn add_constraint(&mut self, constraint: SqlConstraint) {
        let mut key = constraint.name.clone();
        let mut n = 1;
        while self.constraints.contains_key(&key) {
            n += 1;
            key = format!("{}_{}", constraint.name, n);
        }
        self.constraints.insert(key, constraint);
    }

    /// Replace the model with the tables of `schema` in the live catalog.
    ///
    /// Only objects of that schema are read, so a same-named table in
    /// another schema never merges into the model. The five catalog queries (columns, stored procedures, functions,
    /// constraints, default values) run independently. A failing query is
    /// recorded in [`errors`](SqlDatabase::errors) and the others still run.
    /// Returns `true` when every query succeeded.
    pub async fn load_database_metadata<D: Database>(&mut self, db: &D, schema: &str) -> bool {
        self.tables.clear();
        self.stored_procedures.clear();
        self.constraints.clear();
        self.errors.clear();

        info!("Loading catalog metadata for database {} schema {}", self.name, schema);

        if let Err(e) = self.load_columns(db, schema).await {
            self.record_error("columns", e);
        }
        if let Err(e) = self.load_modules(db, catalog::PROCEDURES_SQL, schema).await {
            self.record_error("stored procedures", e);
        }
        if let Err(e) = self.load_modules(db, catalog::FUNCTIONS_SQL, schema).await {
            self.record_error("functions", e);
        }
        if let Err(e) = self.load_constraints(db, schema).await {
            self.record_error("constraints", e);
        }
        if let Err(e) = self.load_defaults(db, schema).await {
            self.record_error("default values", e);
        }

        debug!(
            "Loaded {} tables, {} modules, {} constraints ({} errors)",
            self.tables.len(),
            self.stored_procedures.len(),
            self.constraints.len(),
            self.errors.len()
        );
        self.errors.is_empty()
    }

    fn record_error(&mut self, what: &str, error: crate::error::CodegenError) {
        warn!("Failed to load {}: {}", what, error);
        self.errors.push(format!("{}: {}", what, error));
    }

    async fn load_columns<D: Database>(&mut self, db: &D, schema: &str) -> Result<()> {
        let rows: Vec<ColumnRow> = db
            .fetch_all(&Query::new(catalog::COLUMNS_SQL).bind(schema))
            .await?;
        for row in rows {
            let table = self
                .tables
                .entry(row.table_name.clone())
                .or_insert_with(|| SqlTable::new(&self.name, &row.table_name));
            table.add_column(SqlColumn {
                name: row.column_name,
                table_name: row.table_name,
                data_type: row.data_type,
                length: row.length,
                precision: row.precision,
                scale: row.scale,
                nullable: row.nullable,
                is_pk: row.is_pk,
                is_identity: row.is_identity,
                ordinal: row.ordinal,
                default_value: None,
            });
        }
        Ok(())
    }

    async fn load_modules<D: Database>(&mut self, db: &D, sql: &str, schema: &str) -> Result<()> {
        let rows: Vec<ModuleRow> = db.fetch_all(&Query::new(sql).bind(schema)).await?;
        for row in rows {
            self.stored_procedures
                .insert(row.name, row.definition.unwrap_or_default());
        }
        Ok(())
    }

    async fn load_constraints<D: Database>(&mut self, db: &D, schema: &str) -> Result<()> {
        let rows: Vec<ConstraintRow> = db
            .fetch_all(&Query::new(catalog::CONSTRAINTS_SQL).bind(schema))
            .await?;
        for row in rows {
            self.add_constraint(SqlConstraint {
                name: row.name,
                fk_table: row.fk_table,
                fk_column: row.fk_column,
                pk_table: row.pk_table,
                pk_column: row.pk_column,
            });
        }
        Ok(())
    }

    async fn load_defaults<D: Database>(&mut self, db: &D, schema: &str) -> Result<()> {
        let rows: Vec<DefaultRow> = db
            .fetch_all(&Query::new(catalog::DEFAULTS_SQL).bind(schema))
            .await?;
        for row in rows {
            let column = self
                .tables
                .get_mut(&row.table_name)
                .and_then(|t| t.columns.get_mut(&row.column_name));
            match (column, row.definition) {
                (Some(column), Some(definition)) => {
                    column.default_value = Some(clean_default_value(&definition));
                }
                (None, _) => debug!(
                    "Default for unknown column {}.{} ignored",
                    row.table_name, row.column_name
                ),
                _ => {}
            }
        }
        Ok(())
    }
}
