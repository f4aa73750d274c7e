//! Names and types of one table, resolved once per generator call

use std::collections::HashSet;

use crate::config::GeneratorOptions;
use crate::error::Result;
use crate::metadata::{BaseType, SqlColumn, SqlTable};

use super::naming::{identifier_or, sanitize_identifier, unique_name, NameFormatter};
use super::type_resolver::{ClrType, TypeResolver};

/// A column with its generated names and C# type.
#[derive(Debug, Clone)]
pub struct ColumnInfo<'a> {
    pub column: &'a SqlColumn,
    pub property: String,
    pub field: String,
    pub param: String,
    /// T-SQL variable name without the `@`
    pub variable: String,
    pub clr: ClrType,
}

impl ColumnInfo<'_> {
    pub fn base_type(&self) -> BaseType {
        self.column.base_type()
    }

    pub fn type_name(&self) -> String {
        self.clr.name()
    }

    /// `[Name]`
    pub fn quoted(&self) -> String {
        quote_ident(&self.column.name)
    }

    /// `@Name`, usable as a T-SQL variable
    pub fn sql_param(&self) -> String {
        format!("@{}", self.variable)
    }
}

/// Everything a generator needs to know about a table.
pub struct TableContext<'a> {
    pub table: &'a SqlTable,
    pub options: &'a GeneratorOptions,
    pub class_name: String,
    /// Root namespace; generators append their own suffix
    pub namespace: String,
    pub columns: Vec<ColumnInfo<'a>>,
}

impl<'a> TableContext<'a> {
    /// Resolve names and types for every column, in column order.
    ///
    /// Columns whose names sanitize to the same identifier get numbered
    /// properties and variables (`OrderId`, `OrderId2`).
    /// Fails with `UnmappedType` on the first column without a C# type.
    pub fn new(
        table: &'a SqlTable,
        options: &'a GeneratorOptions,
        formatter: &dyn NameFormatter,
    ) -> Result<Self> {
        let class_name = formatter.class_name(&table.name);
        let mut properties = HashSet::from([class_name.to_lowercase()]);
        let mut variables = HashSet::new();
        let columns = table
            .columns
            .values()
            .map(|column| {
                let property = unique_name(
                    formatter.property_name(&column.name, &class_name),
                    &mut properties,
                );
                let variable = unique_name(
                    identifier_or(&sanitize_identifier(&column.name), "Column"),
                    &mut variables,
                );
                Ok(ColumnInfo {
                    column,
                    field: formatter.field_name(&property),
                    param: formatter.parameter_name(&property),
                    variable,
                    clr: TypeResolver::require(&table.name, column, options)?,
                    property,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            table,
            options,
            class_name,
            namespace: root_namespace(options, &table.database_name, formatter),
            columns,
        })
    }

    /// `Root.suffix`, or the root itself for an empty suffix
    pub fn namespace_for(&self, suffix: &str) -> String {
        child_namespace(&self.namespace, suffix)
    }

    /// `[dbo].[Game]`
    pub fn qualified_table(&self) -> String {
        qualified_name(&self.options.schema_name, &self.table.name)
    }

    /// `[dbo].[Game_SelectAll]`
    pub fn procedure(&self, action: ProcedureAction) -> String {
        qualified_name(
            &self.options.schema_name,
            &format!("{}_{}", self.table.name, action.suffix()),
        )
    }

    pub fn pk_columns(&self) -> Vec<&ColumnInfo<'a>> {
        self.columns.iter().filter(|c| c.column.is_pk).collect()
    }

    pub fn has_pk(&self) -> bool {
        self.columns.iter().any(|c| c.column.is_pk)
    }

    /// Columns written by INSERT
    pub fn insertable_columns(&self) -> Vec<&ColumnInfo<'a>> {
        self.columns.iter().filter(|c| !c.column.is_identity).collect()
    }

    /// Columns written by UPDATE
    pub fn updatable_columns(&self) -> Vec<&ColumnInfo<'a>> {
        self.columns
            .iter()
            .filter(|c| !c.column.is_pk && !c.column.is_identity)
            .collect()
    }

    /// Header line for generated files
    pub fn header(&self) -> String {
        format!(
            "Generated by dbforge-codegen from table {}.",
            self.qualified_table()
        )
    }
}

/// CRUD procedures generated per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureAction {
    SelectAll,
    SelectById,
    Insert,
    Update,
    Delete,
}

impl ProcedureAction {
    pub fn suffix(&self) -> &'static str {
        match self {
            ProcedureAction::SelectAll => "SelectAll",
            ProcedureAction::SelectById => "SelectById",
            ProcedureAction::Insert => "Insert",
            ProcedureAction::Update => "Update",
            ProcedureAction::Delete => "Delete",
        }
    }
}

pub fn root_namespace(options: &GeneratorOptions, database: &str, formatter: &dyn NameFormatter) -> String {
    options
        .namespace
        .clone()
        .unwrap_or_else(|| formatter.namespace(database))
}

pub fn child_namespace(root: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        root.to_string()
    } else {
        format!("{}.{}", root, suffix)
    }
}

/// `[name]` with embedded `]` doubled
pub fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

pub fn qualified_name(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

/// C# string literal
pub fn string_literal(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::DefaultNameFormatter;

    #[test]
    fn test_context_names() {
        let table = fixtures::game();
        let options = GeneratorOptions::default();
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();
        assert_eq!(ctx.class_name, "Game");
        assert_eq!(ctx.namespace, "Arcade");
        assert_eq!(ctx.namespace_for("Orm"), "Arcade.Orm");
        assert_eq!(ctx.qualified_table(), "[dbo].[Game]");
        assert_eq!(ctx.procedure(ProcedureAction::SelectAll), "[dbo].[Game_SelectAll]");
        let props: Vec<_> = ctx.columns.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(props, vec!["Id", "Name", "Disabled"]);
        assert_eq!(ctx.columns[1].field, "_name");
        assert_eq!(ctx.pk_columns().len(), 1);
        assert_eq!(ctx.insertable_columns().len(), 2);
        assert_eq!(ctx.updatable_columns().len(), 2);
    }

    #[test]
    fn test_namespace_option_wins() {
        let table = fixtures::game();
        let options = GeneratorOptions {
            namespace: Some("Acme.Games".into()),
            ..Default::default()
        };
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();
        assert_eq!(ctx.namespace_for(""), "Acme.Games");
    }

    #[test]
    fn test_unmapped_column_fails() {
        let mut table = fixtures::game();
        table.add_column(crate::metadata::SqlColumn::new("Game", "Location", "geography", 4));
        let options = GeneratorOptions::default();
        assert!(TableContext::new(&table, &options, &DefaultNameFormatter).is_err());
    }

    #[test]
    fn test_colliding_column_names_are_numbered() {
        let table = fixtures::colliding();
        let options = GeneratorOptions::default();
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();

        let props: Vec<_> = ctx.columns.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(props, vec!["Id", "OrderId", "OrderId2"]);
        let fields: Vec<_> = ctx.columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["_id", "_orderId", "_orderId2"]);
        let params: Vec<_> = ctx.columns.iter().map(|c| c.sql_param()).collect();
        assert_eq!(params, vec!["@Id", "@OrderId", "@OrderId2"]);
        assert_eq!(ctx.columns[1].quoted(), "[Order Id]");
    }

    #[test]
    fn test_column_named_like_class_keeps_suffix_unique() {
        let mut table = SqlTable::new("Arcade", "Game");
        table.add_column(SqlColumn::new("Game", "Game", "int", 1));
        table.add_column(SqlColumn::new("Game", "GameValue", "int", 2));
        table.add_column(SqlColumn::new("Game", "!!", "int", 3));
        let options = GeneratorOptions::default();
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();

        let props: Vec<_> = ctx.columns.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(props, vec!["GameValue", "GameValue2", "Column"]);
        assert_eq!(ctx.columns[2].sql_param(), "@Column");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_ident("Odd]Name"), "[Odd]]Name]");
        assert_eq!(string_literal(r#"a "b" \c"#), r#""a \"b\" \\c""#);
    }
}
