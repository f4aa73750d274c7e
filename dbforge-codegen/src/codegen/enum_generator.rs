//! Enum generator - C# enums seeded from the rows of a lookup table

use dbforge::{Database, FromRow, Query};
use std::collections::HashSet;
use tracing::{debug, info};

use super::csharp::{CsFile, Member, TypeDecl, TypeKind};
use super::naming::{escape_keyword, sanitize_identifier, unique_name, NameFormatter};
use super::output::{OutputKind, OutputObject};
use super::table_context::{child_namespace, qualified_name, quote_ident, root_namespace};
use crate::config::GeneratorOptions;
use crate::error::Result;
use crate::metadata::{BaseType, SqlColumn, SqlTable};

pub const ENUMS_NAMESPACE: &str = "Enums";

/// One enum member as read from the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct EnumRow {
    pub value: i64,
    pub label: Option<String>,
}

impl EnumRow {
    pub fn new(value: i64, label: &str) -> Self {
        Self {
            value,
            label: Some(label.to_string()),
        }
    }
}

/// Key and label columns: the first integer column (primary key first) and
/// the first text column.
pub fn enum_columns(table: &SqlTable) -> Option<(&SqlColumn, &SqlColumn)> {
    let integers = || {
        table
            .columns
            .values()
            .filter(|c| c.base_type() == BaseType::Integer)
    };
    let key = integers().find(|c| c.is_pk).or_else(|| integers().next())?;
    let label = table
        .columns
        .values()
        .find(|c| c.base_type() == BaseType::String)?;
    Some((key, label))
}

/// Query returning `value` and `label` for every row, ordered by value
pub fn enum_query(table: &SqlTable, options: &GeneratorOptions) -> Option<Query> {
    let (key, label) = enum_columns(table)?;
    Some(Query::new(format!(
        "SELECT {key} AS [value], CAST({label} AS NVARCHAR(4000)) AS [label] FROM {table} ORDER BY {key}",
        key = quote_ident(&key.name),
        label = quote_ident(&label.name),
        table = qualified_name(&options.schema_name, &table.name),
    )))
}

/// Read the lookup rows of `table` through `db` and generate its enum.
pub async fn generate_enum<D: Database>(
    db: &D,
    table: &SqlTable,
    options: &GeneratorOptions,
    formatter: &dyn NameFormatter,
) -> Result<OutputObject> {
    let Some(query) = enum_query(table, options) else {
        info!(
            "Table {} has no integer key and text label column, writing a placeholder enum",
            table.name
        );
        return Ok(placeholder_enum(table, options, formatter));
    };
    let rows: Vec<EnumRow> = db.fetch_all(&query).await?;
    debug!("Read {} enum rows from {}", rows.len(), table.name);
    Ok(enum_file(table, options, formatter, &rows))
}

/// Render an enum from already fetched rows.
pub fn enum_file(
    table: &SqlTable,
    options: &GeneratorOptions,
    formatter: &dyn NameFormatter,
    rows: &[EnumRow],
) -> OutputObject {
    let name = formatter.class_name(&table.name);
    let mut decl = TypeDecl::new(TypeKind::Enum, "public", &name);
    if rows
        .iter()
        .any(|r| i32::try_from(r.value).is_err())
    {
        decl = decl.with_base("long");
    }

    let mut used = HashSet::new();
    for row in rows {
        let member = unique_name(member_name(row), &mut used);
        decl.push(Member::EnumValue {
            name: member,
            value: row.value.to_string(),
        });
    }

    render(table, options, formatter, decl)
}

fn placeholder_enum(table: &SqlTable, options: &GeneratorOptions, formatter: &dyn NameFormatter) -> OutputObject {
    let mut decl = TypeDecl::new(TypeKind::Enum, "public", &formatter.class_name(&table.name));
    decl.push(Member::Comment(vec![format!(
        "Members not generated: table {} has no integer key column and text label column.",
        qualified_name(&options.schema_name, &table.name)
    )]));
    render(table, options, formatter, decl)
}

fn render(
    table: &SqlTable,
    options: &GeneratorOptions,
    formatter: &dyn NameFormatter,
    decl: TypeDecl,
) -> OutputObject {
    let name = decl.name.clone();
    let namespace = child_namespace(
        &root_namespace(options, &table.database_name, formatter),
        ENUMS_NAMESPACE,
    );
    let file = CsFile::new(&namespace)
        .header_line(format!(
            "Generated by dbforge-codegen from the rows of table {}.",
            qualified_name(&options.schema_name, &table.name)
        ))
        .with_type(decl);
    OutputObject::new(OutputKind::Enum, &name, file.render())
}

/// Sanitized label, or `Value<n>` when nothing legal is left
fn member_name(row: &EnumRow) -> String {
    let name = sanitize_identifier(row.label.as_deref().unwrap_or_default());
    if name.is_empty() {
        if row.value < 0 {
            format!("ValueMinus{}", row.value.unsigned_abs())
        } else {
            format!("Value{}", row.value)
        }
    } else {
        escape_keyword(&name)
    }
}
