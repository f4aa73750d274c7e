//! Table metadata

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::SqlColumn;
use super::constraint::SqlConstraint;
use super::database::SqlDatabase;

/// One table; columns are kept in ordinal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlTable {
    pub name: String,
    /// Name of the owning database
    pub database_name: String,
    pub columns: IndexMap<String, SqlColumn>,
}

impl SqlTable {
    pub fn new(database_name: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            database_name: database_name.to_string(),
            columns: IndexMap::new(),
        }
    }

    /// Append a column. A column with the same name is replaced in place.
    pub fn add_column(&mut self, column: SqlColumn) {
        self.columns.insert(column.name.clone(), column);
    }

    /// Primary key columns in ordinal order; empty when the table has none.
    pub fn pk_list(&self) -> Vec<&SqlColumn> {
        self.columns.values().filter(|c| c.is_pk).collect()
    }

    /// The identity column, if any.
    pub fn identity_column(&self) -> Option<&SqlColumn> {
        self.columns.values().find(|c| c.is_identity)
    }

    /// Constraints of `database` where this table is on either side.
    pub fn table_constraints<'a>(&self, database: &'a SqlDatabase) -> Vec<&'a SqlConstraint> {
        database
            .constraints
            .values()
            .filter(|c| c.involves(&self.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pk_list_empty_when_no_key() {
        let mut table = SqlTable::new("Arcade", "AuditLog");
        table.add_column(SqlColumn::new("AuditLog", "Message", "nvarchar", 1));
        assert!(table.pk_list().is_empty());
        assert!(table.identity_column().is_none());
    }

    #[test]
    fn test_columns_keep_insertion_order() {
        let mut table = SqlTable::new("Arcade", "Game");
        for (i, name) in ["Id", "Name", "Disabled"].iter().enumerate() {
            table.add_column(SqlColumn::new("Game", name, "int", i as i32 + 1));
        }
        let names: Vec<_> = table.columns.keys().cloned().collect();
        assert_eq!(names, vec!["Id", "Name", "Disabled"]);
    }

    #[test]
    fn test_table_constraints() {
        let mut db = SqlDatabase::new("Arcade", "");
        db.constraints.insert(
            "FK_Score_Game".to_string(),
            SqlConstraint {
                name: "FK_Score_Game".to_string(),
                fk_table: "Score".to_string(),
                fk_column: "GameId".to_string(),
                pk_table: "Game".to_string(),
                pk_column: "Id".to_string(),
            },
        );
        assert_eq!(SqlTable::new("Arcade", "Game").table_constraints(&db).len(), 1);
        assert_eq!(SqlTable::new("Arcade", "Score").table_constraints(&db).len(), 1);
        assert!(SqlTable::new("Arcade", "Player").table_constraints(&db).is_empty());
    }
}
