//! T-SQL schema parser using sqlparser-rs

use sqlparser::ast::{
    ColumnOption, Expr, ForeignKeyConstraint, Ident, IndexColumn, ObjectName,
    PrimaryKeyConstraint, Statement, TableConstraint,
};
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use crate::error::Result;
use crate::metadata::{clean_default_value, SqlColumn, SqlConstraint, SqlDatabase, SqlTable};

/// Parse a T-SQL schema script into database metadata.
///
/// `GO` batch separators are dropped before parsing and statements other
/// than `CREATE TABLE` are ignored.
pub fn parse_schema(database_name: &str, sql: &str) -> Result<SqlDatabase> {
    let script = strip_batch_separators(sql);
    let statements = Parser::parse_sql(&MsSqlDialect {}, &script)?;

    let mut database = SqlDatabase::new(database_name, "");

    for stmt in statements {
        if let Statement::CreateTable(create_table) = stmt {
            let (table, constraints) = extract_table(database_name, &create_table);
            debug!(
                "Parsed table {} ({} columns, {} foreign keys)",
                table.name,
                table.columns.len(),
                constraints.len()
            );
            database.tables.insert(table.name.clone(), table);
            for constraint in constraints {
                database.add_constraint(constraint);
            }
        }
    }

    Ok(database)
}

fn strip_batch_separators(sql: &str) -> String {
    sql.lines()
        .filter(|line| !line.trim().eq_ignore_ascii_case("GO"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract table metadata and foreign keys from a CREATE TABLE statement
fn extract_table(
    database_name: &str,
    create: &sqlparser::ast::CreateTable,
) -> (SqlTable, Vec<SqlConstraint>) {
    let name = extract_table_name(&create.name);
    let mut table = SqlTable::new(database_name, &name);

    for (i, col_def) in create.columns.iter().enumerate() {
        table.add_column(extract_column(&name, col_def, i as i32 + 1));
    }

    let mut constraints = Vec::new();
    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols, ..
            }) => {
                for pk_col in pk_cols {
                    let col_name = extract_ident_from_index_column(pk_col);
                    if let Some(col) = table.columns.get_mut(&col_name) {
                        col.is_pk = true;
                        col.nullable = false;
                    }
                }
            }
            TableConstraint::ForeignKey(ForeignKeyConstraint {
                name: fk_name,
                columns,
                foreign_table,
                referred_columns,
                ..
            }) => {
                let pk_table = extract_table_name(foreign_table);
                let fk_name = fk_name
                    .as_ref()
                    .map(extract_ident)
                    .unwrap_or_else(|| format!("FK_{}_{}", name, pk_table));
                for (col, ref_col) in columns.iter().zip(referred_columns.iter()) {
                    constraints.push(SqlConstraint {
                        name: fk_name.clone(),
                        fk_table: name.clone(),
                        fk_column: extract_ident(col),
                        pk_table: pk_table.clone(),
                        pk_column: extract_ident(ref_col),
                    });
                }
            }
            _ => {}
        }
    }

    (table, constraints)
}

/// Extract column metadata from a column definition
fn extract_column(table_name: &str, col_def: &sqlparser::ast::ColumnDef, ordinal: i32) -> SqlColumn {
    let (data_type, args) = split_type(&format!("{}", col_def.data_type));
    let mut column = SqlColumn::new(table_name, &extract_ident(&col_def.name), &data_type, ordinal);
    column.nullable = true;

    match column.sql_data_type() {
        Some(ty) if ty.has_length() => {
            if let Some(arg) = args.first() {
                column.length = if arg.eq_ignore_ascii_case("MAX") {
                    -1
                } else {
                    arg.parse().unwrap_or(0)
                };
            }
        }
        Some(ty) if ty.has_precision() => {
            column.precision = args.first().and_then(|a| a.parse().ok()).unwrap_or(18);
            column.scale = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(0);
        }
        _ => {}
    }

    for option in &col_def.options {
        match &option.option {
            ColumnOption::NotNull => {
                column.nullable = false;
            }
            ColumnOption::Null => {
                column.nullable = true;
            }
            ColumnOption::Default(expr) => {
                column.default_value = Some(clean_default_value(&format!("{}", expr)));
            }
            ColumnOption::PrimaryKey(_) => {
                column.is_pk = true;
                column.nullable = false;
            }
            other => {
                if format!("{}", other).to_uppercase().starts_with("IDENTITY") {
                    column.is_identity = true;
                    column.nullable = false;
                }
            }
        }
    }

    column
}

/// Split `NVARCHAR(50)` into `("nvarchar", ["50"])`.
fn split_type(rendered: &str) -> (String, Vec<String>) {
    match rendered.split_once('(') {
        Some((base, rest)) => {
            let args = rest
                .trim_end_matches(')')
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            (base.trim().to_lowercase(), args)
        }
        None => (rendered.trim().to_lowercase(), Vec::new()),
    }
}

/// Extract a simple string from an ObjectName, dropping any schema prefix
fn extract_table_name(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

/// Extract a string from an Ident, without brackets
fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::BaseType;

    const GAME_SQL: &str = r#"
        CREATE TABLE [dbo].[Game] (
            [Id] INT IDENTITY(1,1) NOT NULL PRIMARY KEY,
            [Name] VARCHAR(50) NOT NULL,
            [Disabled] BIT NOT NULL DEFAULT ((0)),
            [Price] DECIMAL(10, 2) NULL,
            [Notes] NVARCHAR(MAX) NULL
        );
        GO
    "#;

    #[test]
    fn test_parse_simple_table() {
        let db = parse_schema("Arcade", GAME_SQL).unwrap();
        assert_eq!(db.name, "Arcade");
        let game = db.table("Game").unwrap();
        assert_eq!(game.database_name, "Arcade");
        let names: Vec<_> = game.columns.keys().cloned().collect();
        assert_eq!(names, vec!["Id", "Name", "Disabled", "Price", "Notes"]);

        let id = &game.columns["Id"];
        assert!(id.is_pk);
        assert!(id.is_identity);
        assert!(!id.nullable);
        assert_eq!(id.data_type, "int");
        assert_eq!(id.ordinal, 1);
    }

    #[test]
    fn test_lengths_and_precision() {
        let db = parse_schema("Arcade", GAME_SQL).unwrap();
        let game = db.table("Game").unwrap();
        assert_eq!(game.columns["Name"].length, 50);
        assert_eq!(game.columns["Notes"].length, -1);
        assert_eq!(game.columns["Price"].precision, 10);
        assert_eq!(game.columns["Price"].scale, 2);
        assert!(game.columns["Price"].nullable);
        assert_eq!(game.columns["Disabled"].base_type(), BaseType::Bool);
    }

    #[test]
    fn test_default_values_are_cleaned() {
        let db = parse_schema("Arcade", GAME_SQL).unwrap();
        let disabled = &db.table("Game").unwrap().columns["Disabled"];
        assert_eq!(disabled.default_value.as_deref(), Some("0"));
    }

    #[test]
    fn test_table_level_keys() {
        let sql = r#"
            CREATE TABLE Score (
                GameId INT NOT NULL,
                PlayerId INT NOT NULL,
                Points BIGINT NOT NULL,
                CONSTRAINT PK_Score PRIMARY KEY (GameId, PlayerId),
                CONSTRAINT FK_Score_Game FOREIGN KEY (GameId) REFERENCES Game (Id)
            );
        "#;
        let db = parse_schema("Arcade", sql).unwrap();
        let score = db.table("Score").unwrap();
        assert_eq!(score.pk_list().len(), 2);
        let fk = &db.constraints["FK_Score_Game"];
        assert_eq!(fk.fk_table, "Score");
        assert_eq!(fk.fk_column, "GameId");
        assert_eq!(fk.pk_table, "Game");
        assert_eq!(fk.pk_column, "Id");
    }

    #[test]
    fn test_table_without_primary_key() {
        let sql = "CREATE TABLE AuditLog (Message NVARCHAR(200) NULL, LoggedAt DATETIME NOT NULL);";
        let db = parse_schema("Arcade", sql).unwrap();
        assert!(db.table("AuditLog").unwrap().pk_list().is_empty());
    }

    #[test]
    fn test_non_table_statements_ignored() {
        let sql = "CREATE TABLE T (Id INT NOT NULL);\nGO\nCREATE VIEW V AS SELECT Id FROM T;\ngo";
        let db = parse_schema("Arcade", sql).unwrap();
        assert_eq!(db.tables.len(), 1);
    }

    #[test]
    fn test_invalid_sql() {
        assert!(parse_schema("Arcade", "CREATE TABLE (").is_err());
    }

    #[test]
    fn test_split_type() {
        assert_eq!(split_type("NVARCHAR(MAX)"), ("nvarchar".to_string(), vec!["MAX".to_string()]));
        assert_eq!(
            split_type("DECIMAL(10,2)"),
            ("decimal".to_string(), vec!["10".to_string(), "2".to_string()])
        );
        assert_eq!(split_type("BIT"), ("bit".to_string(), vec![]));
    }
}
