//! DAL generator - stored procedure wrappers over `IDatabase`
//!
//! `IDatabase` is the application's data-access helper; its namespace is
//! expected among the configured namespace includes. Procedure names match
//! the script produced by the procedure generator.
//!
//! Entities are referenced as `global::Root.Orm.Game`: the DAL namespace
//! `Root.Dal` sits inside `Root`, where the POCO `Root.Game` would win over
//! a `using Root.Orm;` directive.

use tracing::debug;

use super::csharp::{CsFile, Member, Method, Param, Stmt, TypeDecl, TypeKind};
use super::orm_generator::ORM_NAMESPACE;
use super::output::{OutputKind, OutputObject};
use super::table_context::{string_literal, ColumnInfo, ProcedureAction, TableContext};

pub const DAL_NAMESPACE: &str = "Dal";

/// DAL class name, `Game` -> `GameDal`
pub fn dal_name(class_name: &str) -> String {
    format!("{}Dal", class_name)
}

/// Fully qualified ORM entity type, `global::Arcade.Orm.Game`
pub fn entity_type(ctx: &TableContext<'_>) -> String {
    format!("global::{}.{}", ctx.namespace_for(ORM_NAMESPACE), ctx.class_name)
}

/// Generate the DAL class for a table
pub fn generate_dal(ctx: &TableContext<'_>) -> OutputObject {
    debug!("Generating DAL for {}", ctx.table.name);
    let name = dal_name(&ctx.class_name);

    let mut class = TypeDecl::new(TypeKind::Class, "public partial", &name)
        .with_doc(format!("Stored procedure access for table {}.", ctx.qualified_table()));

    class.push(Member::field("private readonly", "IDatabase", "_database", None));
    class.push(Member::Method(Method::constructor(
        "public",
        &name,
        vec![Param::new("IDatabase", "database")],
        vec![Stmt::line("_database = database;")],
    )));

    class.push(Member::Method(load_all(ctx)));
    class.push(requires_pk(ctx, "LoadSingleFromDb", load_single));
    class.push(Member::Method(insert(ctx)));
    class.push(if ctx.has_pk() && ctx.updatable_columns().is_empty() {
        Member::Comment(vec![format!(
            "UpdateInDb is not generated: every column of table {} is part of the key.",
            ctx.qualified_table()
        )])
    } else {
        requires_pk(ctx, "UpdateInDb", update)
    });
    class.push(requires_pk(ctx, "DeleteFromDb", delete));

    let file = CsFile::new(&ctx.namespace_for(DAL_NAMESPACE))
        .header_line(ctx.header())
        .usings([
            "System",
            "System.Collections.Generic",
            "System.Data",
            "System.Data.SqlClient",
        ])
        .usings(&ctx.options.namespace_includes)
        .with_type(class);

    OutputObject::new(OutputKind::Dal, &name, file.render())
}

/// Build a keyed method, or a comment in its place when the table has no key.
fn requires_pk(
    ctx: &TableContext<'_>,
    method: &str,
    build: fn(&TableContext<'_>) -> Method,
) -> Member {
    if ctx.has_pk() {
        Member::Method(build(ctx))
    } else {
        Member::Comment(vec![format!(
            "{} is not generated: table {} has no primary key.",
            method,
            ctx.qualified_table()
        )])
    }
}

/// `new SqlParameter("@Name", SqlDbType.VarChar, 50) { Value = ... },`
fn sql_parameter(col: &ColumnInfo<'_>, value: &str) -> Stmt {
    let sql_type = col.column.sql_data_type();
    let db_type = sql_type.map(|t| t.db_type_name()).unwrap_or("Variant");
    let value = if col.clr.accepts_null() {
        format!("(object){} ?? DBNull.Value", value)
    } else {
        value.to_string()
    };

    let mut ctor_args = vec![string_literal(&col.sql_param()), format!("SqlDbType.{}", db_type)];
    let mut init = Vec::new();
    match sql_type {
        Some(ty) if ty.has_length() && col.column.length != 0 => {
            ctor_args.push(col.column.length.to_string());
        }
        Some(ty) if ty.has_precision() && col.column.precision > 0 => {
            init.push(format!("Precision = {}", col.column.precision));
            init.push(format!("Scale = {}", col.column.scale));
        }
        _ => {}
    }
    init.push(format!("Value = {}", value));

    Stmt::line(format!(
        "new SqlParameter({}) {{ {} }},",
        ctor_args.join(", "),
        init.join(", ")
    ))
}

fn parameter_list(params: Vec<Stmt>) -> Stmt {
    if params.is_empty() {
        Stmt::line("var parameters = new List<SqlParameter>();")
    } else {
        Stmt::initializer("var parameters = new List<SqlParameter>", params)
    }
}

fn key_params(ctx: &TableContext<'_>) -> Vec<Param> {
    ctx.pk_columns()
        .iter()
        .map(|col| Param::new(col.type_name(), &col.param))
        .collect()
}

fn key_sql_params(ctx: &TableContext<'_>) -> Vec<Stmt> {
    ctx.pk_columns()
        .iter()
        .map(|col| sql_parameter(col, &col.param))
        .collect()
}

fn load_all(ctx: &TableContext<'_>) -> Method {
    Method::new(
        "public",
        &format!("List<{}>", entity_type(ctx)),
        "LoadAllFromDb",
        vec![],
        vec![
            parameter_list(vec![]),
            Stmt::line(format!(
                "return _database.ExecuteStoredProcedure<{}>({}, parameters);",
                entity_type(ctx),
                string_literal(&ctx.procedure(ProcedureAction::SelectAll))
            )),
        ],
    )
}

fn load_single(ctx: &TableContext<'_>) -> Method {
    Method::new(
        "public",
        &entity_type(ctx),
        "LoadSingleFromDb",
        key_params(ctx),
        vec![
            parameter_list(key_sql_params(ctx)),
            Stmt::line(format!(
                "var results = _database.ExecuteStoredProcedure<{}>({}, parameters);",
                entity_type(ctx),
                string_literal(&ctx.procedure(ProcedureAction::SelectById))
            )),
            Stmt::line("return results.Count > 0 ? results[0] : null;"),
        ],
    )
}

fn execute_non_query(ctx: &TableContext<'_>, action: ProcedureAction) -> Stmt {
    Stmt::line(format!(
        "return _database.ExecuteNonQueryStoredProcedure({}, parameters);",
        string_literal(&ctx.procedure(action))
    ))
}

fn insert(ctx: &TableContext<'_>) -> Method {
    let params = ctx
        .insertable_columns()
        .iter()
        .map(|col| sql_parameter(col, &format!("item.{}", col.property)))
        .collect();
    Method::new(
        "public",
        "int",
        "InsertIntoDb",
        vec![Param::new(entity_type(ctx), "item")],
        vec![parameter_list(params), execute_non_query(ctx, ProcedureAction::Insert)],
    )
}

fn update(ctx: &TableContext<'_>) -> Method {
    let params = ctx
        .pk_columns()
        .into_iter()
        .chain(ctx.updatable_columns())
        .map(|col| sql_parameter(col, &format!("item.{}", col.property)))
        .collect();
    Method::new(
        "public",
        "int",
        "UpdateInDb",
        vec![Param::new(entity_type(ctx), "item")],
        vec![parameter_list(params), execute_non_query(ctx, ProcedureAction::Update)],
    )
}

fn delete(ctx: &TableContext<'_>) -> Method {
    Method::new(
        "public",
        "int",
        "DeleteFromDb",
        key_params(ctx),
        vec![
            parameter_list(key_sql_params(ctx)),
            execute_non_query(ctx, ProcedureAction::Delete),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::table_context::fixtures;
    use crate::codegen::DefaultNameFormatter;
    use crate::config::GeneratorOptions;

    fn dal(table: &crate::metadata::SqlTable) -> String {
        let options = GeneratorOptions {
            namespace_includes: vec!["Acme.Data".into()],
            ..Default::default()
        };
        let ctx = TableContext::new(table, &options, &DefaultNameFormatter).unwrap();
        generate_dal(&ctx).body
    }

    #[test]
    fn test_dal_with_key() {
        let body = dal(&fixtures::game());
        assert!(body.contains("using System.Data.SqlClient;\nusing Acme.Data;\n"));
        assert!(!body.contains("using Arcade.Orm;"));
        assert!(body.contains("public partial class GameDal\n"));
        assert!(body.contains("private readonly IDatabase _database;"));
        assert!(body.contains(
            "return _database.ExecuteStoredProcedure<global::Arcade.Orm.Game>(\"[dbo].[Game_SelectAll]\", parameters);"
        ));
        assert!(body.contains("public List<global::Arcade.Orm.Game> LoadAllFromDb()\n"));
        assert!(body.contains("public global::Arcade.Orm.Game LoadSingleFromDb(int id)\n"));
        assert!(body.contains("public int InsertIntoDb(global::Arcade.Orm.Game item)\n"));
        assert!(body.contains("public int UpdateInDb(global::Arcade.Orm.Game item)\n"));
        assert!(body.contains("new SqlParameter(\"@Id\", SqlDbType.Int) { Value = id },"));
        assert!(body.contains("public int DeleteFromDb(int id)\n"));
        assert!(body.contains("\"[dbo].[Game_Delete]\""));
    }

    #[test]
    fn test_insert_skips_identity() {
        let body = dal(&fixtures::game());
        let insert = body
            .split("public int InsertIntoDb")
            .nth(1)
            .and_then(|rest| rest.split("public int UpdateInDb").next())
            .unwrap();
        assert!(!insert.contains("@Id"));
        assert!(insert.contains(
            "new SqlParameter(\"@Name\", SqlDbType.VarChar, 50) { Value = (object)item.Name ?? DBNull.Value },"
        ));
        assert!(insert.contains("new SqlParameter(\"@Disabled\", SqlDbType.Bit) { Value = item.Disabled },"));
    }

    #[test]
    fn test_decimal_parameter() {
        let body = dal(&fixtures::mixed());
        assert!(body.contains(
            "new SqlParameter(\"@Points\", SqlDbType.Decimal) { Precision = 10, Scale = 2, Value = (object)item.Points ?? DBNull.Value },"
        ));
        assert!(body.contains("new SqlParameter(\"@Player\", SqlDbType.NVarChar, -1)"));
    }

    #[test]
    fn test_no_primary_key_comments() {
        let body = dal(&fixtures::audit_log());
        assert!(body.contains("public List<global::Arcade.Orm.AuditLog> LoadAllFromDb()"));
        assert!(body.contains("public int InsertIntoDb(global::Arcade.Orm.AuditLog item)"));
        for method in ["LoadSingleFromDb", "UpdateInDb", "DeleteFromDb"] {
            assert!(body.contains(&format!(
                "// {} is not generated: table [dbo].[AuditLog] has no primary key.",
                method
            )));
            assert!(!body.contains(&format!(" {}(", method)));
        }
        assert_eq!(body.matches('{').count(), body.matches('}').count());
    }

    #[test]
    fn test_entity_type_ignores_poco_namespace() {
        let table = fixtures::game();
        let options = GeneratorOptions {
            namespace: Some("Acme.Arcade".into()),
            ..Default::default()
        };
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();
        assert_eq!(entity_type(&ctx), "global::Acme.Arcade.Orm.Game");
        let body = generate_dal(&ctx).body;
        assert!(body.contains("namespace Acme.Arcade.Dal\n"));
        assert!(!body.contains("<Game>"));
        assert!(!body.contains("(Game item)"));
    }

    #[test]
    fn test_key_only_table() {
        let mut table = crate::metadata::SqlTable::new("Arcade", "GameTag");
        for (i, name) in ["GameId", "TagId"].iter().enumerate() {
            let mut col = crate::metadata::SqlColumn::new("GameTag", name, "int", i as i32 + 1);
            col.is_pk = true;
            table.add_column(col);
        }
        let body = dal(&table);
        assert!(body.contains("// UpdateInDb is not generated: every column of table [dbo].[GameTag] is part of the key."));
        assert!(body.contains("public int DeleteFromDb(int gameId, int tagId)"));
    }
}
