//! dbforge-codegen: Generate C# data classes and T-SQL procedures from SQL Server schema metadata
//!
//! The schema comes from one of two sources:
//!
//! - a T-SQL DDL script, parsed offline with `sqlparser-rs`
//! - a live SQL Server catalog, read through [`dbforge`]
//!
//! and is turned into:
//!
//! - POCO classes, ORM entities with change tracking, interfaces
//! - DAL classes wrapping CRUD stored procedures, and the procedure scripts
//! - XML and JSON loaders, a foreign key script, enums from lookup tables
//!
//! # Usage in build.rs
//!
//! Configure in your `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.dbforge-codegen]
//! schema_file = "schema.sql"
//! artifacts = ["poco", "orm", "dal", "base_class"]
//!
//! [package.metadata.dbforge-codegen.options]
//! namespace = "Acme.Arcade"
//! ```
//!
//! Then use a minimal `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     dbforge_codegen::generate_from_cargo_metadata()
//!         .expect("Failed to generate C# sources");
//! }
//! ```
//!
//! # Programmatic Configuration
//!
//! ```rust,ignore
//! use dbforge_codegen::{CodegenBuilder, OutputKind};
//!
//! CodegenBuilder::new("schema.sql")
//!     .output_dir("generated")
//!     .artifacts(&[OutputKind::Poco, OutputKind::Dal])
//!     .namespace("Acme.Arcade")
//!     .generate()?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! dbforge-codegen --schema schema.sql --output ./generated generate
//! dbforge-codegen --connection "Server=tcp:localhost,1433;Database=Arcade;..." enums GameType
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod metadata;
pub mod parser;
pub mod writer;

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};

use dbforge::SqlServerDatabase;
use tracing::{debug, info, warn};

pub use codegen::{CodeGenerator, OutputKind, OutputObject};
pub use config::{CodegenConfig, GeneratorOptions};
pub use error::{CodegenError, Result};
pub use metadata::SqlDatabase;

/// Main entry point: load the schema, generate, write.
///
/// Returns the paths of the generated files.
pub fn generate(config: &CodegenConfig) -> Result<Vec<PathBuf>> {
    let outputs = generate_outputs(config)?;
    let paths = writer::write_outputs(&outputs, &config.output_dir, config.dry_run)?;
    info!("Code generation complete ({} files)", paths.len());
    Ok(paths)
}

/// Load the schema and generate every configured artifact in memory
pub fn generate_outputs(config: &CodegenConfig) -> Result<Vec<OutputObject>> {
    config.validate()?;
    let database = load_schema(config)?;
    info!("Found {} tables", database.tables.len());

    let tables = filter_tables(&database, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        tables.len(),
        config.include_tables,
        config.exclude_tables
    );

    let generator = CodeGenerator::new(&config.options)?;
    let mut outputs = generator.generate_database(&database, &tables, &config.artifacts)?;

    // validate() guarantees a connection string whenever enum_tables is set
    if let (false, Some(connection_string)) =
        (config.enum_tables.is_empty(), config.connection_string.as_deref())
    {
        outputs.extend(block_on(generate_enums(
            &generator,
            &database,
            connection_string,
            &config.enum_tables,
        ))??);
    }

    Ok(outputs)
}

/// Build the schema model from the configured source
pub fn load_schema(config: &CodegenConfig) -> Result<SqlDatabase> {
    let name = config.resolved_database_name();
    match (&config.schema_file, &config.connection_string) {
        (Some(schema_file), _) => {
            info!("Parsing schema: {}", schema_file.display());
            let schema_sql = std::fs::read_to_string(schema_file)?;
            parser::parse_schema(&name, &schema_sql)
        }
        (None, Some(connection_string)) => block_on(load_catalog(
            connection_string,
            &name,
            &config.options.schema_name,
        ))?,
        (None, None) => Err(CodegenError::ValidationError(
            "one of schema_file or connection_string is required".into(),
        )),
    }
}

/// Read the tables of one schema from the catalog of a live database.
///
/// Partial metadata is accepted with a warning; the load fails only when no
/// table could be read.
pub async fn load_catalog(
    connection_string: &str,
    database_name: &str,
    schema: &str,
) -> Result<SqlDatabase> {
    info!("Reading catalog of database {}", database_name);
    let db = SqlServerDatabase::new(connection_string);
    let mut model = SqlDatabase::new(database_name, connection_string);
    if !model.load_database_metadata(&db, schema).await {
        if model.tables.is_empty() {
            return Err(CodegenError::MetadataError(model.errors.join("; ")));
        }
        warn!(
            "Catalog read with {} errors, continuing with partial metadata",
            model.errors.len()
        );
    }
    Ok(model)
}

/// Generate enums for the named lookup tables; unknown names are skipped.
pub async fn generate_enums(
    generator: &CodeGenerator<'_>,
    database: &SqlDatabase,
    connection_string: &str,
    table_names: &[String],
) -> Result<Vec<OutputObject>> {
    let db = SqlServerDatabase::new(connection_string);
    let mut outputs = Vec::new();
    for name in table_names {
        match database.table(name) {
            Some(table) => outputs.push(generator.generate_enum(&db, table).await?),
            None => warn!("Enum table {} not found in {}", name, database.name),
        }
    }
    Ok(outputs)
}

/// Run a future on a single-threaded runtime
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// Filter tables based on include/exclude patterns
pub fn filter_tables<'a>(database: &'a SqlDatabase, include: &str, exclude: &str) -> Vec<&'a metadata::SqlTable> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<&str> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(str::trim).collect()
    };
    let exclude_set: HashSet<&str> = exclude
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    database
        .tables
        .values()
        .filter(|t| {
            let name = t.name.as_str();
            let included = include_all || include_set.contains(name);
            let excluded = exclude_set.contains(name);
            included && !excluded
        })
        .collect()
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder reading the given DDL script
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Create a new builder reading a live catalog
    pub fn from_connection(connection_string: &str) -> Self {
        Self {
            config: CodegenConfig::default_with_connection(connection_string),
        }
    }

    /// Set the output root
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the database name used for namespaces
    pub fn database_name(mut self, name: &str) -> Self {
        self.config.database_name = Some(name.to_string());
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Replace the set of generated artifacts
    pub fn artifacts(mut self, kinds: &[OutputKind]) -> Self {
        self.config.artifacts = kinds.to_vec();
        self
    }

    /// Generate enums from these lookup tables
    pub fn enum_tables(mut self, tables: &[&str]) -> Self {
        self.config.enum_tables = tables.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set the root namespace
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.options.namespace = Some(namespace.to_string());
        self
    }

    /// Replace all generator options
    pub fn options(mut self, options: GeneratorOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the code
    pub fn generate(self) -> Result<Vec<PathBuf>> {
        generate(&self.config)
    }
}

/// Configuration for `[package.metadata.dbforge-codegen]` in Cargo.toml
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CargoMetadataConfig {
    /// Path to the DDL script, relative to the manifest
    schema_file: Option<String>,

    /// Environment variable holding the connection string
    connection_string_env: Option<String>,

    database_name: Option<String>,

    #[serde(default)]
    include_tables: Vec<String>,

    #[serde(default)]
    exclude_tables: Vec<String>,

    artifacts: Option<Vec<OutputKind>>,

    #[serde(default)]
    enum_tables: Vec<String>,

    /// Output root, relative to the manifest (default: OUT_DIR)
    output_dir: Option<String>,

    options: Option<GeneratorOptions>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackage {
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackageMetadata {
    #[serde(rename = "dbforge-codegen")]
    dbforge_codegen: Option<CargoMetadataConfig>,
}

/// Generate code from `[package.metadata.dbforge-codegen]` in Cargo.toml
///
/// ```toml
/// [package.metadata.dbforge-codegen]
/// schema_file = "schema.sql"
/// exclude_tables = ["AuditLog"]
/// ```
///
/// Reading a live database instead names the variable holding the
/// connection string:
///
/// ```toml
/// [package.metadata.dbforge-codegen]
/// connection_string_env = "ARCADE_DB"
/// enum_tables = ["GameType"]
/// ```
pub fn generate_from_cargo_metadata() -> Result<Vec<PathBuf>> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        CodegenError::ConfigError(
            "CARGO_MANIFEST_DIR not set - are you running from build.rs?".into(),
        )
    })?;
    let out_dir = std::env::var("OUT_DIR").ok().map(PathBuf::from);

    let cargo_toml_path = PathBuf::from(&manifest_dir).join("Cargo.toml");
    let builder = builder_from_manifest(Path::new(&manifest_dir), out_dir)?;
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    builder.generate()
}

/// Read `Cargo.toml` under `manifest_dir` into a builder; files go to
/// `out_dir` unless the section sets `output_dir`
fn builder_from_manifest(manifest_dir: &Path, out_dir: Option<PathBuf>) -> Result<CodegenBuilder> {
    let cargo_toml_path = manifest_dir.join("Cargo.toml");
    let cargo_toml_content = std::fs::read_to_string(&cargo_toml_path)?;

    let cargo_toml: CargoToml = toml::from_str(&cargo_toml_content).map_err(|e| {
        CodegenError::ConfigError(format!(
            "Failed to parse {}: {}",
            cargo_toml_path.display(),
            e
        ))
    })?;

    let metadata_config = cargo_toml
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.dbforge_codegen)
        .ok_or_else(|| {
            CodegenError::ConfigError(
                "Missing [package.metadata.dbforge-codegen] section in Cargo.toml".into(),
            )
        })?;

    let mut builder = match (&metadata_config.schema_file, &metadata_config.connection_string_env) {
        (Some(schema_file), None) => {
            let schema_path = manifest_dir.join(schema_file);
            println!("cargo:rerun-if-changed={}", schema_path.display());
            CodegenBuilder::new(&schema_path)
        }
        (None, Some(var)) => {
            let connection_string = std::env::var(var).map_err(|_| {
                CodegenError::ConfigError(format!("environment variable {} is not set", var))
            })?;
            println!("cargo:rerun-if-env-changed={}", var);
            CodegenBuilder::from_connection(&connection_string)
        }
        _ => {
            return Err(CodegenError::ConfigError(
                "exactly one of schema_file or connection_string_env is required in [package.metadata.dbforge-codegen]".into(),
            ));
        }
    };

    // Default to OUT_DIR
    let output_dir = match (&metadata_config.output_dir, out_dir) {
        (Some(dir), _) => manifest_dir.join(dir),
        (None, Some(dir)) => dir,
        (None, None) => {
            return Err(CodegenError::ConfigError(
                "OUT_DIR not set - are you running from build.rs?".into(),
            ));
        }
    };
    builder = builder.output_dir(output_dir);

    if let Some(name) = &metadata_config.database_name {
        builder = builder.database_name(name);
    }
    if let Some(options) = metadata_config.options {
        builder = builder.options(options);
    }
    if let Some(artifacts) = &metadata_config.artifacts {
        builder = builder.artifacts(artifacts);
    }

    if !metadata_config.include_tables.is_empty() {
        builder = builder.include_tables(&as_strs(&metadata_config.include_tables));
    }
    if !metadata_config.exclude_tables.is_empty() {
        builder = builder.exclude_tables(&as_strs(&metadata_config.exclude_tables));
    }
    if !metadata_config.enum_tables.is_empty() {
        builder = builder.enum_tables(&as_strs(&metadata_config.enum_tables));
    }

    Ok(builder)
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
