//! Interface generator - `IGame` with one property per column

use super::csharp::{CsFile, Member, TypeDecl, TypeKind};
use super::output::{OutputKind, OutputObject};
use super::table_context::TableContext;

pub const INTERFACES_NAMESPACE: &str = "Interfaces";

/// Interface name for a class, `Game` -> `IGame`
pub fn interface_name(class_name: &str) -> String {
    format!("I{}", class_name)
}

pub fn generate_interface(ctx: &TableContext<'_>) -> OutputObject {
    let name = interface_name(&ctx.class_name);
    let mut decl = TypeDecl::new(TypeKind::Interface, "public", &name);
    decl.extend(
        ctx.columns
            .iter()
            .map(|col| Member::auto_property("", &col.type_name(), &col.property)),
    );

    let file = CsFile::new(&ctx.namespace_for(INTERFACES_NAMESPACE))
        .header_line(ctx.header())
        .using("System")
        .usings(&ctx.options.namespace_includes)
        .with_type(decl);

    OutputObject::new(OutputKind::Interface, &name, file.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::table_context::fixtures;
    use crate::codegen::DefaultNameFormatter;
    use crate::config::GeneratorOptions;

    #[test]
    fn test_interface() {
        let table = fixtures::game();
        let options = GeneratorOptions::default();
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();
        let out = generate_interface(&ctx);
        assert_eq!(out.file_name, "IGame.cs");
        assert_eq!(out.output_path, "Interfaces");
        assert!(out.body.contains("namespace Arcade.Interfaces\n{\n    public interface IGame\n    {\n"));
        assert!(out.body.contains(
            "        int Id { get; set; }\n        string Name { get; set; }\n        bool Disabled { get; set; }\n    }\n"
        ));
    }
}
