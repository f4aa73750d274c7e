//! ORM generator - entity classes with backing fields, change tracking,
//! value equality and `DataTable` conversion

use tracing::debug;

use crate::metadata::BaseType;

use super::csharp::{Accessors, CsFile, Member, Method, Param, Property, Stmt, TypeDecl, TypeKind};
use super::output::{OutputKind, OutputObject};
use super::table_context::{string_literal, ColumnInfo, TableContext};
use super::type_resolver::ClrType;

pub const ORM_NAMESPACE: &str = "Orm";

/// Multipliers for `GetHashCode`, used in column order and wrapping around.
pub const HASH_PRIMES: [u32; 24] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Prime for the column at `position` (0-based)
pub fn hash_prime(position: usize) -> u32 {
    HASH_PRIMES[position % HASH_PRIMES.len()]
}

/// Generate the ORM class for a table
pub fn generate_orm(ctx: &TableContext<'_>) -> OutputObject {
    debug!("Generating ORM class {} for {}", ctx.class_name, ctx.table.name);
    let options = ctx.options;

    let mut class = TypeDecl::new(TypeKind::Class, "public partial", &ctx.class_name)
        .with_doc(format!("Entity for table {}.", ctx.qualified_table()));
    if options.include_base_class {
        class = class.with_base(&options.base_class_name);
    }

    class.push(Member::field(
        "public const",
        "string",
        "TableName",
        Some(string_literal(&ctx.qualified_table())),
    ));
    class.extend(
        ctx.columns
            .iter()
            .map(|col| Member::field("private", &col.type_name(), &col.field, None)),
    );

    if options.include_dirty_flag && !options.include_base_class {
        class.push(Member::auto_property("public", "bool", "IsDirty"));
    }

    for col in &ctx.columns {
        class.push(backed_property(col, options.include_dirty_flag));
    }

    class.push(Member::Method(Method::constructor("public", &ctx.class_name, vec![], vec![])));
    if !ctx.columns.is_empty() {
        class.push(Member::Method(full_constructor(ctx)));
    }
    class.push(Member::Method(equals_method(ctx)));
    class.push(Member::Method(hash_code_method(ctx)));
    class.push(Member::Method(to_string_method(ctx)));
    class.push(Member::Method(convert_to_data_table(ctx)));

    let file = CsFile::new(&ctx.namespace_for(ORM_NAMESPACE))
        .header_line(ctx.header())
        .usings([
            "System",
            "System.Collections",
            "System.Collections.Generic",
            "System.Data",
            "System.Globalization",
            "System.Text",
        ])
        .usings(&options.namespace_includes)
        .with_type(class);

    OutputObject::new(OutputKind::Orm, &ctx.class_name, file.render())
}

fn backed_property(col: &ColumnInfo<'_>, dirty_flag: bool) -> Member {
    let mut setter = vec![Stmt::line(format!("{} = value;", col.field))];
    if dirty_flag {
        setter.push(Stmt::line("IsDirty = true;"));
    }
    Member::Property(Property {
        doc: None,
        modifiers: "public".into(),
        ty: col.type_name(),
        name: col.property.clone(),
        accessors: Accessors::Backed {
            field: col.field.clone(),
            setter,
        },
    })
}

fn full_constructor(ctx: &TableContext<'_>) -> Method {
    let params = ctx
        .columns
        .iter()
        .map(|col| Param::new(col.type_name(), &col.param))
        .collect();
    let body = ctx
        .columns
        .iter()
        .map(|col| Stmt::line(format!("{} = {};", col.field, col.param)))
        .collect();
    Method::constructor("public", &ctx.class_name, params, body)
}

fn equality_expr(col: &ColumnInfo<'_>) -> String {
    let (a, b) = (&col.field, format!("other.{}", col.field));
    match col.base_type() {
        BaseType::String => format!("string.Equals({}, {}, StringComparison.Ordinal)", a, b),
        BaseType::BinaryData => format!(
            "StructuralComparisons.StructuralEqualityComparer.Equals({}, {})",
            a, b
        ),
        BaseType::Unknown => format!("object.Equals({}, {})", a, b),
        _ => format!("{} == {}", a, b),
    }
}

fn equals_method(ctx: &TableContext<'_>) -> Method {
    let mut body = vec![
        Stmt::line(format!("var other = obj as {};", ctx.class_name)),
        Stmt::block(
            "if (ReferenceEquals(other, null))",
            vec![Stmt::line("return false;")],
        ),
    ];
    let terms: Vec<String> = ctx.columns.iter().map(equality_expr).collect();
    match terms.split_first() {
        None => body.push(Stmt::line("return true;")),
        Some((first, rest)) => {
            if rest.is_empty() {
                body.push(Stmt::line(format!("return {};", first)));
            } else {
                body.push(Stmt::line(format!("return {}", first)));
                for (i, term) in rest.iter().enumerate() {
                    let end = if i + 1 == rest.len() { ";" } else { "" };
                    body.push(Stmt::line(format!("    && {}{}", term, end)));
                }
            }
        }
    }
    Method::new(
        "public override",
        "bool",
        "Equals",
        vec![Param::new("object", "obj")],
        body,
    )
}

fn hash_expr(col: &ColumnInfo<'_>) -> String {
    let field = &col.field;
    match &col.clr {
        ClrType::Bytes => format!(
            "({} == null ? 0 : StructuralComparisons.StructuralEqualityComparer.GetHashCode({}))",
            field, field
        ),
        ty if ty.accepts_null() && !matches!(ty, ClrType::Nullable(_)) => {
            format!("({} == null ? 0 : {}.GetHashCode())", field, field)
        }
        _ => format!("{}.GetHashCode()", field),
    }
}

fn hash_code_method(ctx: &TableContext<'_>) -> Method {
    let mut body = vec![Stmt::line("int hash = 17;")];
    for (i, col) in ctx.columns.iter().enumerate() {
        body.push(Stmt::line(format!(
            "hash = hash * {} + {};",
            hash_prime(i),
            hash_expr(col)
        )));
    }
    body.push(Stmt::line("return hash;"));
    Method::new(
        "public override",
        "int",
        "GetHashCode",
        vec![],
        vec![Stmt::block("unchecked", body)],
    )
}

fn display_expr(col: &ColumnInfo<'_>) -> String {
    let field = &col.field;
    let access = if matches!(col.clr, ClrType::Nullable(_)) {
        format!("{}?", field)
    } else {
        field.clone()
    };
    match col.clr.underlying() {
        ClrType::DateTime | ClrType::DateTimeOffset => {
            format!("{}.ToString(\"o\", CultureInfo.InvariantCulture)", access)
        }
        ClrType::TimeSpan => format!("{}.ToString(\"c\")", access),
        ClrType::Float | ClrType::Double | ClrType::Decimal => {
            format!("{}.ToString(CultureInfo.InvariantCulture)", access)
        }
        ClrType::Bytes => format!(
            "({} == null ? \"null\" : Convert.ToBase64String({}))",
            field, field
        ),
        _ => field.clone(),
    }
}

fn to_string_method(ctx: &TableContext<'_>) -> Method {
    let mut body = vec![
        Stmt::line("var sb = new StringBuilder();"),
        Stmt::line(format!("sb.Append({});", string_literal(&format!("{} {{", ctx.class_name)))),
    ];
    for (i, col) in ctx.columns.iter().enumerate() {
        let sep = if i == 0 { " " } else { ", " };
        body.push(Stmt::line(format!(
            "sb.Append({}).Append({});",
            string_literal(&format!("{}{} = ", sep, col.property)),
            display_expr(col)
        )));
    }
    body.push(Stmt::line("sb.Append(\" }\");"));
    body.push(Stmt::line("return sb.ToString();"));
    Method::new("public override", "string", "ToString", vec![], body)
}

fn convert_to_data_table(ctx: &TableContext<'_>) -> Method {
    let mut body = vec![Stmt::line(format!(
        "var table = new DataTable({});",
        string_literal(&ctx.table.name)
    ))];
    for col in &ctx.columns {
        body.push(Stmt::line(format!(
            "table.Columns.Add({}, typeof({}));",
            string_literal(&col.column.name),
            col.clr.underlying().name()
        )));
    }

    let mut row = vec![Stmt::line("var row = table.NewRow();")];
    for col in &ctx.columns {
        let value = if col.clr.accepts_null() {
            format!("(object)item.{} ?? DBNull.Value", col.property)
        } else {
            format!("item.{}", col.property)
        };
        row.push(Stmt::line(format!(
            "row[{}] = {};",
            string_literal(&col.column.name),
            value
        )));
    }
    row.push(Stmt::line("table.Rows.Add(row);"));

    body.push(Stmt::block("foreach (var item in items)", row));
    body.push(Stmt::line("return table;"));

    Method::new(
        "public static",
        "DataTable",
        "ConvertToDataTable",
        vec![Param::new(format!("IEnumerable<{}>", ctx.class_name), "items")],
        body,
    )
}
