//! Configuration settings for dbforge-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use super::options::GeneratorOptions;
use crate::codegen::OutputKind;
use crate::error::{CodegenError, Result};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// T-SQL DDL script to read the schema from
    #[serde(default)]
    pub schema_file: Option<PathBuf>,

    /// ADO.NET style connection string for reading the live catalog
    #[serde(default)]
    pub connection_string: Option<String>,

    /// Database name; derived from the connection string or schema file when unset
    #[serde(default)]
    pub database_name: Option<String>,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Artifacts to generate
    #[serde(default = "default_artifacts")]
    pub artifacts: Vec<OutputKind>,

    /// Lookup tables turned into C# enums (needs `connection_string`)
    #[serde(default)]
    pub enum_tables: Vec<String>,

    /// Root output directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub options: GeneratorOptions,
}

// Default value functions for serde
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_artifacts() -> Vec<OutputKind> {
    vec![
        OutputKind::Poco,
        OutputKind::Orm,
        OutputKind::Dal,
        OutputKind::Interface,
        OutputKind::BaseClass,
        OutputKind::StoredProcedures,
    ]
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: None,
            connection_string: None,
            database_name: None,
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            artifacts: default_artifacts(),
            enum_tables: Vec::new(),
            output_dir: default_output_dir(),
            dry_run: default_dry_run(),
            log_level: None,
            options: GeneratorOptions::default(),
        }
    }
}

impl CodegenConfig {
    /// Create a default config reading the given DDL script
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file: Some(schema_file),
            ..Default::default()
        }
    }

    /// Create a default config reading the live catalog
    pub fn default_with_connection(connection_string: &str) -> Self {
        Self {
            connection_string: Some(connection_string.to_string()),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name("dbforge-codegen").required(false));
        }

        // DBFORGE_CODEGEN_DRY_RUN, DBFORGE_CODEGEN_OPTIONS__SCHEMA_NAME, ...
        builder = builder.add_source(
            Environment::with_prefix("DBFORGE_CODEGEN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Database name used for namespaces and the metadata model
    pub fn resolved_database_name(&self) -> String {
        if let Some(name) = self.database_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        if let Some(name) = self
            .connection_string
            .as_deref()
            .and_then(database_from_connection_string)
        {
            return name;
        }
        self.schema_file
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
            .map(String::from)
            .unwrap_or_else(|| defaults::DATABASE_NAME.to_string())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let connection = self
            .connection_string
            .as_deref()
            .filter(|c| !c.trim().is_empty());

        match (&self.schema_file, connection) {
            (None, None) => {
                return Err(CodegenError::ValidationError(
                    "one of schema_file or connection_string is required".into(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(CodegenError::ValidationError(
                    "schema_file and connection_string are mutually exclusive".into(),
                ));
            }
            (Some(schema_file), None) => {
                if !schema_file.exists() {
                    return Err(CodegenError::ValidationError(format!(
                        "Schema file not found: {}",
                        schema_file.display()
                    )));
                }
            }
            (None, Some(_)) => {}
        }

        if !self.enum_tables.is_empty() && connection.is_none() {
            return Err(CodegenError::ValidationError(
                "enum_tables requires connection_string (enum values are read from the database)".into(),
            ));
        }

        if self.artifacts.contains(&OutputKind::Enum) {
            return Err(CodegenError::ValidationError(
                "enums are selected through enum_tables, not artifacts".into(),
            ));
        }

        self.options.validate()
    }
}

/// `Database=` or `Initial Catalog=` value of an ADO.NET connection string
fn database_from_connection_string(connection_string: &str) -> Option<String> {
    connection_string.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        let matches = key.eq_ignore_ascii_case("database") || key.eq_ignore_ascii_case("initial catalog");
        let value = value.trim();
        (matches && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.include_tables, "*");
        assert!(config.artifacts.contains(&OutputKind::Poco));
        assert!(!config.artifacts.contains(&OutputKind::ConstraintScript));
        assert!(config.log_level.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_validation_missing_source() {
        let config = CodegenConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_both_sources() {
        let mut config = CodegenConfig::default_with_connection("Server=.;Database=Arcade");
        config.schema_file = Some(PathBuf::from("schema.sql"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_schema_file() {
        let config = CodegenConfig::default_with_schema(PathBuf::from("/nonexistent/schema.sql"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enum_tables_need_connection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CREATE TABLE T (Id INT);").unwrap();
        let mut config = CodegenConfig::default_with_schema(file.path().to_path_buf());
        assert!(config.validate().is_ok());

        config.enum_tables = vec!["GameType".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
schema_file = "schema.sql"
database_name = "Arcade"
artifacts = ["poco", "dal", "constraint_script"]
exclude_tables = "AuditLog"

[options]
namespace = "Acme.Arcade"
namespace_includes = "Acme.Data;System.Linq"
include_dirty_flag = false
"#
        )
        .unwrap();

        let config = CodegenConfig::from_file(file.path()).unwrap();
        assert_eq!(config.schema_file, Some(PathBuf::from("schema.sql")));
        assert_eq!(
            config.artifacts,
            vec![OutputKind::Poco, OutputKind::Dal, OutputKind::ConstraintScript]
        );
        assert_eq!(config.exclude_tables, "AuditLog");
        assert_eq!(config.options.namespace.as_deref(), Some("Acme.Arcade"));
        assert_eq!(config.options.namespace_includes.len(), 2);
        assert!(!config.options.include_dirty_flag);
        assert!(config.options.include_base_class);
    }

    #[test]
    fn test_resolved_database_name() {
        let mut config = CodegenConfig::default_with_connection(
            "Server=tcp:localhost,1433;Initial Catalog=Arcade;User Id=sa",
        );
        assert_eq!(config.resolved_database_name(), "Arcade");

        config.database_name = Some("Override".into());
        assert_eq!(config.resolved_database_name(), "Override");

        let config = CodegenConfig::default_with_schema(PathBuf::from("demos/retro_arcade.sql"));
        assert_eq!(config.resolved_database_name(), "retro_arcade");

        assert_eq!(CodegenConfig::default().resolved_database_name(), "Database");
    }
}
