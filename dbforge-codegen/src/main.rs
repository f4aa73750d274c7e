//! CLI entry point for dbforge-codegen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dbforge_codegen::config::CodegenConfig;
use dbforge_codegen::OutputKind;

#[derive(Parser)]
#[command(name = "dbforge-codegen")]
#[command(about = "Generate C# data classes and T-SQL procedures from SQL Server schema metadata")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to T-SQL schema script (overrides config)
    #[arg(short, long, conflicts_with = "connection")]
    schema: Option<PathBuf>,

    /// SQL Server connection string (overrides config)
    #[arg(long)]
    connection: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Root namespace of the generated classes (overrides config)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every configured artifact
    Generate,
    /// Generate only POCO classes
    Poco,
    /// Generate only ORM classes and their base class
    Orm,
    /// Generate only DAL classes
    Dal,
    /// Generate only interfaces
    Interface,
    /// Generate only XML and JSON loaders
    Loaders,
    /// Generate only stored procedure and constraint scripts
    Procedures,
    /// Generate enums from lookup tables (needs --connection)
    Enums {
        /// Lookup tables to read
        #[arg(required = true)]
        tables: Vec<String>,
    },
    /// Inspect schema (show loaded tables for debugging)
    Inspect {
        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides; a source given on the command line replaces the configured one
    if let Some(schema) = cli.schema {
        config.schema_file = Some(schema);
        config.connection_string = None;
    }
    if let Some(connection) = cli.connection {
        config.connection_string = Some(connection);
        config.schema_file = None;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(namespace) = cli.namespace {
        config.options.namespace = Some(namespace);
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Apply command-specific settings
    match cli.command {
        Some(Commands::Poco) => config.artifacts = vec![OutputKind::Poco],
        Some(Commands::Orm) => config.artifacts = vec![OutputKind::Orm, OutputKind::BaseClass],
        Some(Commands::Dal) => config.artifacts = vec![OutputKind::Dal],
        Some(Commands::Interface) => config.artifacts = vec![OutputKind::Interface],
        Some(Commands::Loaders) => {
            config.artifacts = vec![OutputKind::XmlLoader, OutputKind::JsonLoader]
        }
        Some(Commands::Procedures) => {
            config.artifacts = vec![OutputKind::StoredProcedures, OutputKind::ConstraintScript]
        }
        Some(Commands::Enums { tables }) => {
            config.artifacts.clear();
            config.enum_tables = tables;
        }
        Some(Commands::Inspect { json }) => {
            return inspect_schema(&config, json);
        }
        Some(Commands::Generate) | None => {}
    }

    let paths = dbforge_codegen::generate(&config)?;

    if config.dry_run {
        println!("Dry run mode - would generate:");
        for path in &paths {
            println!("  {}", path.display());
        }
        return Ok(());
    }

    info!("Wrote {} files to {}", paths.len(), config.output_dir.display());
    Ok(())
}

fn inspect_schema(config: &CodegenConfig, json: bool) -> Result<()> {
    config.validate()?;
    let database = dbforge_codegen::load_schema(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&database)?);
        return Ok(());
    }

    println!("Database {}: {} tables\n", database.name, database.tables.len());
    for table in database.tables.values() {
        println!("Table: {}", table.name);
        println!("  Columns:");
        for col in table.columns.values() {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            let identity = if col.is_identity { " IDENTITY" } else { "" };
            let pk = if col.is_pk { " PK" } else { "" };
            println!(
                "    - {} {} {}{}{}",
                col.name,
                col.sql_type_declaration(),
                nullable,
                identity,
                pk
            );
            if let Some(default) = &col.default_value {
                println!("      DEFAULT {}", default);
            }
        }
        let constraints = table.table_constraints(&database);
        if !constraints.is_empty() {
            println!("  Foreign Keys:");
            for fk in constraints {
                println!(
                    "    - {}: {}.{} -> {}.{}",
                    fk.name, fk.fk_table, fk.fk_column, fk.pk_table, fk.pk_column
                );
            }
        }
        println!();
    }

    if !database.stored_procedures.is_empty() {
        println!("Stored procedures and functions:");
        for name in database.stored_procedures.keys() {
            println!("  - {}", name);
        }
    }
    for error in &database.errors {
        println!("Error: {}", error);
    }

    Ok(())
}
