//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Default database name when neither config nor catalog provides one
pub const DATABASE_NAME: &str = "Database";

/// Default output root; artifacts land in per-kind subdirectories
pub const OUTPUT_DIR: &str = "./generated";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Whether to script foreign keys by default
pub const GENERATE_CONSTRAINT_SCRIPT: bool = false;

/// Keep `T?` for nullable value-type columns by default
pub const CONVERT_NULLABLE_FIELDS: bool = false;

/// Track property changes in ORM classes by default
pub const INCLUDE_DIRTY_FLAG: bool = true;

/// Derive ORM classes from a shared base class by default
pub const INCLUDE_BASE_CLASS: bool = true;

/// Default ORM base class name
pub const BASE_CLASS_NAME: &str = "EntityBase";

/// Default SQL schema for generated procedure and table references
pub const SCHEMA_NAME: &str = "dbo";
