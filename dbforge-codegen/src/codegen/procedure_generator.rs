//! Stored procedure generator - CRUD procedures called by the DAL
//!
//! Insert, update and delete procedures `RETURN @@ROWCOUNT`, which the DAL
//! hands back as the number of affected rows.

use super::csharp::CodeWriter;
use super::output::{OutputKind, OutputObject};
use super::table_context::{ColumnInfo, ProcedureAction, TableContext};

/// Generate `<Table>_Procedures.sql` for a table
pub fn generate_procedures(ctx: &TableContext<'_>) -> OutputObject {
    let mut w = CodeWriter::new();
    w.line("-- <auto-generated>");
    w.line(&format!("--     {}", ctx.header()));
    w.line("-- </auto-generated>");

    let all: Vec<&ColumnInfo<'_>> = ctx.columns.iter().collect();
    let pk = ctx.pk_columns();

    select_all(&mut w, ctx, &all);
    if pk.is_empty() {
        for action in [ProcedureAction::SelectById, ProcedureAction::Update, ProcedureAction::Delete] {
            w.blank();
            w.line(&format!(
                "-- {} is not generated: table {} has no primary key.",
                ctx.procedure(action),
                ctx.qualified_table()
            ));
        }
        insert(&mut w, ctx);
    } else {
        select_by_id(&mut w, ctx, &all, &pk);
        insert(&mut w, ctx);
        let updatable = ctx.updatable_columns();
        if updatable.is_empty() {
            w.blank();
            w.line(&format!(
                "-- {} is not generated: every column of table {} is part of the key.",
                ctx.procedure(ProcedureAction::Update),
                ctx.qualified_table()
            ));
        } else {
            update(&mut w, ctx, &pk, &updatable);
        }
        delete(&mut w, ctx, &pk);
    }

    OutputObject::new(
        OutputKind::StoredProcedures,
        &format!("{}_Procedures", ctx.table.name),
        w.finish(),
    )
}

fn begin_procedure(w: &mut CodeWriter, name: &str, params: &[&ColumnInfo<'_>]) {
    w.blank();
    w.line(&format!("IF OBJECT_ID(N'{}', N'P') IS NOT NULL", name.replace('\'', "''")));
    w.indent();
    w.line(&format!("DROP PROCEDURE {};", name));
    w.dedent();
    w.line("GO");
    w.blank();
    w.line(&format!("CREATE PROCEDURE {}", name));
    w.indent();
    for (i, col) in params.iter().enumerate() {
        let sep = if i + 1 < params.len() { "," } else { "" };
        w.line(&format!(
            "{} {}{}",
            col.sql_param(),
            col.column.sql_type_declaration(),
            sep
        ));
    }
    w.dedent();
    w.line("AS");
    w.line("BEGIN");
    w.indent();
    w.line("SET NOCOUNT ON;");
    w.blank();
}

fn end_procedure(w: &mut CodeWriter) {
    w.dedent();
    w.line("END");
    w.line("GO");
}

fn column_list(columns: &[&ColumnInfo<'_>]) -> String {
    if columns.is_empty() {
        "*".to_string()
    } else {
        columns.iter().map(|c| c.quoted()).collect::<Vec<_>>().join(", ")
    }
}

fn where_clause(w: &mut CodeWriter, keys: &[&ColumnInfo<'_>]) {
    for (i, col) in keys.iter().enumerate() {
        let keyword = if i == 0 { "WHERE" } else { "  AND" };
        let end = if i + 1 == keys.len() { ";" } else { "" };
        w.line(&format!("{} {} = {}{}", keyword, col.quoted(), col.sql_param(), end));
    }
}

fn select_all(w: &mut CodeWriter, ctx: &TableContext<'_>, all: &[&ColumnInfo<'_>]) {
    begin_procedure(w, &ctx.procedure(ProcedureAction::SelectAll), &[]);
    w.line(&format!("SELECT {}", column_list(all)));
    w.line(&format!("FROM {};", ctx.qualified_table()));
    end_procedure(w);
}

fn select_by_id(
    w: &mut CodeWriter,
    ctx: &TableContext<'_>,
    all: &[&ColumnInfo<'_>],
    pk: &[&ColumnInfo<'_>],
) {
    begin_procedure(w, &ctx.procedure(ProcedureAction::SelectById), pk);
    w.line(&format!("SELECT {}", column_list(all)));
    w.line(&format!("FROM {}", ctx.qualified_table()));
    where_clause(w, pk);
    end_procedure(w);
}

fn insert(w: &mut CodeWriter, ctx: &TableContext<'_>) {
    let columns = ctx.insertable_columns();
    begin_procedure(w, &ctx.procedure(ProcedureAction::Insert), &columns);
    if columns.is_empty() {
        w.line(&format!("INSERT INTO {} DEFAULT VALUES;", ctx.qualified_table()));
    } else {
        w.line(&format!("INSERT INTO {} ({})", ctx.qualified_table(), column_list(&columns)));
        let values: Vec<String> = columns.iter().map(|c| c.sql_param()).collect();
        w.line(&format!("VALUES ({});", values.join(", ")));
    }
    w.blank();
    w.line("RETURN @@ROWCOUNT;");
    end_procedure(w);
}

fn update(
    w: &mut CodeWriter,
    ctx: &TableContext<'_>,
    pk: &[&ColumnInfo<'_>],
    updatable: &[&ColumnInfo<'_>],
) {
    let params: Vec<&ColumnInfo<'_>> = pk.iter().chain(updatable).copied().collect();
    begin_procedure(w, &ctx.procedure(ProcedureAction::Update), &params);
    w.line(&format!("UPDATE {}", ctx.qualified_table()));
    for (i, col) in updatable.iter().enumerate() {
        let keyword = if i == 0 { "SET" } else { "   " };
        let sep = if i + 1 < updatable.len() { "," } else { "" };
        w.line(&format!("{} {} = {}{}", keyword, col.quoted(), col.sql_param(), sep));
    }
    where_clause(w, pk);
    w.blank();
    w.line("RETURN @@ROWCOUNT;");
    end_procedure(w);
}

fn delete(w: &mut CodeWriter, ctx: &TableContext<'_>, pk: &[&ColumnInfo<'_>]) {
    begin_procedure(w, &ctx.procedure(ProcedureAction::Delete), pk);
    w.line(&format!("DELETE FROM {}", ctx.qualified_table()));
    where_clause(w, pk);
    w.blank();
    w.line("RETURN @@ROWCOUNT;");
    end_procedure(w);
}
