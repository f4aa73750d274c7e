//! Loader generators - read and write lists of POCOs as XML or JSON files

use super::csharp::{CsFile, Member, Method, Param, Stmt, TypeDecl, TypeKind};
use super::output::{OutputKind, OutputObject};
use super::table_context::TableContext;

pub const LOADERS_NAMESPACE: &str = "Loaders";

/// Serialization format of a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderFormat {
    Xml,
    Json,
}

impl LoaderFormat {
    fn class_suffix(&self) -> &'static str {
        match self {
            LoaderFormat::Xml => "XmlLoader",
            LoaderFormat::Json => "JsonLoader",
        }
    }

    fn kind(&self) -> OutputKind {
        match self {
            LoaderFormat::Xml => OutputKind::XmlLoader,
            LoaderFormat::Json => OutputKind::JsonLoader,
        }
    }
}

/// Generate `GameXmlLoader` or `GameJsonLoader`.
///
/// Loaders live in `Root.Loaders` and work on the POCO from `Root`.
pub fn generate_loader(ctx: &TableContext<'_>, format: LoaderFormat) -> OutputObject {
    let name = format!("{}{}", ctx.class_name, format.class_suffix());
    let list = format!("List<{}>", ctx.class_name);

    let (usings, load, save) = match format {
        LoaderFormat::Xml => (
            ["System.Collections.Generic", "System.IO", "System.Xml.Serialization"],
            vec![
                Stmt::line(format!("var serializer = new XmlSerializer(typeof({}));", list)),
                Stmt::block(
                    "using (var stream = File.OpenRead(path))",
                    vec![Stmt::line(format!("return ({})serializer.Deserialize(stream);", list))],
                ),
            ],
            vec![
                Stmt::line(format!("var serializer = new XmlSerializer(typeof({}));", list)),
                Stmt::block(
                    "using (var stream = File.Create(path))",
                    vec![Stmt::line("serializer.Serialize(stream, items);")],
                ),
            ],
        ),
        LoaderFormat::Json => (
            ["System.Collections.Generic", "System.IO", "System.Text.Json"],
            vec![
                Stmt::line("var json = File.ReadAllText(path);"),
                Stmt::line(format!(
                    "return JsonSerializer.Deserialize<{}>(json) ?? new {}();",
                    list, list
                )),
            ],
            vec![
                Stmt::line("var options = new JsonSerializerOptions { WriteIndented = true };"),
                Stmt::line("File.WriteAllText(path, JsonSerializer.Serialize(items, options));"),
            ],
        ),
    };

    let mut class = TypeDecl::new(TypeKind::Class, "public static", &name);
    class.push(Member::Method(Method::new(
        "public static",
        &list,
        "LoadFromFile",
        vec![Param::new("string", "path")],
        load,
    )));
    class.push(Member::Method(Method::new(
        "public static",
        "void",
        "SaveToFile",
        vec![Param::new("string", "path"), Param::new(&list, "items")],
        save,
    )));

    let file = CsFile::new(&ctx.namespace_for(LOADERS_NAMESPACE))
        .header_line(ctx.header())
        .usings(usings)
        .usings(&ctx.options.namespace_includes)
        .with_type(class);

    OutputObject::new(format.kind(), &name, file.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::table_context::fixtures;
    use crate::codegen::DefaultNameFormatter;
    use crate::config::GeneratorOptions;

    #[test]
    fn test_xml_loader() {
        let table = fixtures::game();
        let options = GeneratorOptions::default();
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();
        let out = generate_loader(&ctx, LoaderFormat::Xml);
        assert_eq!(out.file_name, "GameXmlLoader.cs");
        assert_eq!(out.kind, OutputKind::XmlLoader);
        assert!(out.body.contains("namespace Arcade.Loaders\n"));
        assert!(out.body.contains("using System.Xml.Serialization;"));
        assert!(out.body.contains("public static List<Game> LoadFromFile(string path)"));
        assert!(out.body.contains("return (List<Game>)serializer.Deserialize(stream);"));
        assert!(out.body.contains("public static void SaveToFile(string path, List<Game> items)"));
    }

    #[test]
    fn test_json_loader() {
        let table = fixtures::game();
        let options = GeneratorOptions::default();
        let ctx = TableContext::new(&table, &options, &DefaultNameFormatter).unwrap();
        let out = generate_loader(&ctx, LoaderFormat::Json);
        assert_eq!(out.file_name, "GameJsonLoader.cs");
        assert_eq!(out.output_path, "Loaders");
        assert!(out.body.contains("using System.Text.Json;"));
        assert!(out
            .body
            .contains("return JsonSerializer.Deserialize<List<Game>>(json) ?? new List<Game>();"));
    }
}
