//! POCO generator - plain data classes, one property per column

use tracing::debug;

use super::csharp::{CsFile, Member, Method, TypeDecl, TypeKind};
use super::output::{OutputKind, OutputObject};
use super::table_context::TableContext;

/// Generate the POCO class for a table
pub fn generate_poco(ctx: &TableContext<'_>) -> OutputObject {
    debug!("Generating POCO {} for {}", ctx.class_name, ctx.table.name);

    let mut class = TypeDecl::new(TypeKind::Class, "public partial", &ctx.class_name)
        .with_doc(format!("Row of table {}.", ctx.qualified_table()));

    for col in &ctx.columns {
        class.push(Member::auto_property("public", &col.type_name(), &col.property));
    }
    class.push(Member::Method(Method::constructor(
        "public",
        &ctx.class_name,
        vec![],
        vec![],
    )));

    let file = CsFile::new(&ctx.namespace_for(""))
        .header_line(ctx.header())
        .using("System")
        .usings(&ctx.options.namespace_includes)
        .with_type(class);

    OutputObject::new(OutputKind::Poco, &ctx.class_name, file.render())
}
