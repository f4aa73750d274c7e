//! Constraint script generator - foreign keys of a database as `ALTER TABLE`

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

use super::csharp::CodeWriter;
use super::output::{OutputKind, OutputObject};
use super::table_context::{qualified_name, quote_ident};
use crate::config::GeneratorOptions;
use crate::metadata::{SqlConstraint, SqlDatabase};

pub const CONSTRAINT_SCRIPT_NAME: &str = "Constraints";

/// Script every foreign key of `database`.
///
/// Constraints linking the same columns are scripted once, whatever their
/// name. Rows sharing a constraint name form one multi-column key.
pub fn generate_constraint_script(database: &SqlDatabase, options: &GeneratorOptions) -> OutputObject {
    let mut seen: HashSet<&SqlConstraint> = HashSet::new();
    let mut keys: IndexMap<&str, Vec<&SqlConstraint>> = IndexMap::new();
    for constraint in database.constraints.values() {
        if seen.insert(constraint) {
            keys.entry(constraint.name.as_str()).or_default().push(constraint);
        } else {
            debug!("Skipping duplicate constraint {}", constraint.name);
        }
    }

    let mut w = CodeWriter::new();
    w.line("-- <auto-generated>");
    w.line(&format!(
        "--     Generated by dbforge-codegen from database {}.",
        database.name
    ));
    w.line("-- </auto-generated>");

    for (name, rows) in &keys {
        let Some(first) = rows.first() else {
            continue;
        };
        let fk_columns: Vec<String> = rows.iter().map(|c| quote_ident(&c.fk_column)).collect();
        let pk_columns: Vec<String> = rows.iter().map(|c| quote_ident(&c.pk_column)).collect();
        w.blank();
        w.line(&format!(
            "ALTER TABLE {} WITH CHECK ADD CONSTRAINT {}",
            qualified_name(&options.schema_name, &first.fk_table),
            quote_ident(name)
        ));
        w.indent();
        w.line(&format!("FOREIGN KEY ({})", fk_columns.join(", ")));
        w.line(&format!(
            "REFERENCES {} ({});",
            qualified_name(&options.schema_name, &first.pk_table),
            pk_columns.join(", ")
        ));
        w.dedent();
        w.line("GO");
    }

    OutputObject::new(OutputKind::ConstraintScript, CONSTRAINT_SCRIPT_NAME, w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk(name: &str, fk_table: &str, fk_column: &str, pk_table: &str, pk_column: &str) -> SqlConstraint {
        SqlConstraint {
            name: name.into(),
            fk_table: fk_table.into(),
            fk_column: fk_column.into(),
            pk_table: pk_table.into(),
            pk_column: pk_column.into(),
        }
    }

    #[test]
    fn test_script() {
        let mut db = SqlDatabase::new("Arcade", "");
        db.add_constraint(fk("FK_Score_Game", "Score", "GameId", "Game", "Id"));
        let out = generate_constraint_script(&db, &GeneratorOptions::default());
        assert_eq!(out.file_name, "Constraints.sql");
        assert_eq!(out.output_path, "Sql");
        assert!(out.body.contains(
            "ALTER TABLE [dbo].[Score] WITH CHECK ADD CONSTRAINT [FK_Score_Game]\n    FOREIGN KEY ([GameId])\n    REFERENCES [dbo].[Game] ([Id]);\nGO\n"
        ));
    }

    #[test]
    fn test_duplicates_scripted_once() {
        let mut db = SqlDatabase::new("Arcade", "");
        db.add_constraint(fk("FK_Score_Game", "Score", "GameId", "Game", "Id"));
        db.add_constraint(fk("FK_Score_Game_Again", "Score", "GameId", "Game", "Id"));
        let out = generate_constraint_script(&db, &GeneratorOptions::default());
        assert_eq!(out.body.matches("ALTER TABLE").count(), 1);
        assert!(!out.body.contains("FK_Score_Game_Again"));
    }

    #[test]
    fn test_multi_column_key() {
        let mut db = SqlDatabase::new("Arcade", "");
        db.add_constraint(fk("FK_Entry_Score", "Entry", "GameId", "Score", "GameId"));
        db.add_constraint(fk("FK_Entry_Score", "Entry", "PlayerId", "Score", "PlayerId"));
        let out = generate_constraint_script(&db, &GeneratorOptions::default());
        assert_eq!(out.body.matches("ALTER TABLE").count(), 1);
        assert!(out.body.contains("FOREIGN KEY ([GameId], [PlayerId])"));
        assert!(out.body.contains("REFERENCES [dbo].[Score] ([GameId], [PlayerId]);"));
    }

    #[test]
    fn test_empty_database() {
        let out = generate_constraint_script(&SqlDatabase::new("Arcade", ""), &GeneratorOptions::default());
        assert!(!out.body.contains("ALTER TABLE"));
    }
}
