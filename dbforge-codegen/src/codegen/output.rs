//! Generation results

use serde::{Deserialize, Serialize};

/// Language of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    CSharp,
    Sql,
}

impl Language {
    pub fn extension(&self) -> &'static str {
        match self {
            Language::CSharp => "cs",
            Language::Sql => "sql",
        }
    }
}

/// Artifacts the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Poco,
    Orm,
    Dal,
    Interface,
    Enum,
    BaseClass,
    XmlLoader,
    JsonLoader,
    StoredProcedures,
    ConstraintScript,
}

impl OutputKind {
    /// Every kind, in generation order.
    pub const ALL: [OutputKind; 10] = [
        OutputKind::Poco,
        OutputKind::Orm,
        OutputKind::Dal,
        OutputKind::Interface,
        OutputKind::Enum,
        OutputKind::BaseClass,
        OutputKind::XmlLoader,
        OutputKind::JsonLoader,
        OutputKind::StoredProcedures,
        OutputKind::ConstraintScript,
    ];

    pub fn language(&self) -> Language {
        match self {
            OutputKind::StoredProcedures | OutputKind::ConstraintScript => Language::Sql,
            _ => Language::CSharp,
        }
    }

    /// Subdirectory of the output root
    pub fn directory(&self) -> &'static str {
        match self {
            OutputKind::Poco => "Poco",
            OutputKind::Orm | OutputKind::BaseClass => "Orm",
            OutputKind::Dal => "Dal",
            OutputKind::Interface => "Interfaces",
            OutputKind::Enum => "Enums",
            OutputKind::XmlLoader | OutputKind::JsonLoader => "Loaders",
            OutputKind::StoredProcedures | OutputKind::ConstraintScript => "Sql",
        }
    }

    /// Produced once per table, from metadata alone
    pub fn is_per_table(&self) -> bool {
        !matches!(
            self,
            OutputKind::Enum | OutputKind::BaseClass | OutputKind::ConstraintScript
        )
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputKind::Poco => "poco",
            OutputKind::Orm => "orm",
            OutputKind::Dal => "dal",
            OutputKind::Interface => "interface",
            OutputKind::Enum => "enum",
            OutputKind::BaseClass => "base_class",
            OutputKind::XmlLoader => "xml_loader",
            OutputKind::JsonLoader => "json_loader",
            OutputKind::StoredProcedures => "stored_procedures",
            OutputKind::ConstraintScript => "constraint_script",
        };
        f.write_str(name)
    }
}

/// One generated file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputObject {
    /// File name including extension, e.g. `Game.cs`
    pub file_name: String,
    /// Directory relative to the output root
    pub output_path: String,
    pub body: String,
    pub kind: OutputKind,
}

impl OutputObject {
    /// Build an output named `<stem>.<ext>` in the kind's directory.
    pub fn new(kind: OutputKind, stem: &str, body: String) -> Self {
        Self {
            file_name: format!("{}.{}", stem, kind.language().extension()),
            output_path: kind.directory().to_string(),
            body,
            kind,
        }
    }

    pub fn language(&self) -> Language {
        self.kind.language()
    }

    /// `output_path/file_name`
    pub fn relative_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.output_path).join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_object_naming() {
        let out = OutputObject::new(OutputKind::Dal, "GameDal", String::new());
        assert_eq!(out.file_name, "GameDal.cs");
        assert_eq!(out.output_path, "Dal");
        assert_eq!(out.language(), Language::CSharp);

        let sql = OutputObject::new(OutputKind::StoredProcedures, "Game_Procedures", String::new());
        assert_eq!(sql.relative_path(), std::path::PathBuf::from("Sql/Game_Procedures.sql"));
    }

    #[test]
    fn test_kind_names_match_serde() {
        for kind in OutputKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_per_table_kinds() {
        assert!(OutputKind::Poco.is_per_table());
        assert!(OutputKind::StoredProcedures.is_per_table());
        assert!(!OutputKind::BaseClass.is_per_table());
        assert!(!OutputKind::Enum.is_per_table());
    }
}
