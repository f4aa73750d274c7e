//! Base class generator - the shared ORM entity base with change tracking

use super::csharp::{Accessors, CsFile, Member, Method, Property, Stmt, TypeDecl, TypeKind};
use super::orm_generator::ORM_NAMESPACE;
use super::output::{OutputKind, OutputObject};
use super::table_context::child_namespace;
use crate::config::GeneratorOptions;

/// Generate `EntityBase` (or the configured base class name) into `root.Orm`.
pub fn generate_base_class(root_namespace: &str, options: &GeneratorOptions) -> OutputObject {
    let name = &options.base_class_name;
    let mut class = TypeDecl::new(TypeKind::Class, "public abstract", name)
        .with_doc("Change tracking shared by generated entities.");

    class.push(Member::auto_property("public", "bool", "IsDirty"));
    class.push(Member::Property(Property {
        doc: None,
        modifiers: "public".into(),
        ty: "bool".into(),
        name: "IsNew".into(),
        accessors: Accessors::Auto {
            init: Some("true".into()),
        },
    }));
    class.push(Member::Method(
        Method::new(
            "public virtual",
            "void",
            "MarkClean",
            vec![],
            vec![Stmt::line("IsDirty = false;"), Stmt::line("IsNew = false;")],
        )
        .with_doc("Call after the entity was saved or loaded."),
    ));

    let file = CsFile::new(&child_namespace(root_namespace, ORM_NAMESPACE))
        .header_line("Generated by dbforge-codegen.")
        .using("System")
        .with_type(class);

    OutputObject::new(OutputKind::BaseClass, name, file.render())
}
