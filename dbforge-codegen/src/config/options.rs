//! Typed options consulted by the generators

use serde::{Deserialize, Deserializer, Serialize};

use super::defaults;
use crate::codegen::{is_csharp_keyword, sanitize_identifier};
use crate::error::{CodegenError, Result};

/// Options shared by every generator.
///
/// Validated once by [`GeneratorOptions::validate`] when a
/// [`CodeGenerator`](crate::codegen::CodeGenerator) is built; emitters read
/// the fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Root namespace. Derived from the database name when unset.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Extra `using` directives, as a list or a `;`/`,` separated string
    #[serde(default, deserialize_with = "deserialize_namespace_includes")]
    pub namespace_includes: Vec<String>,

    /// Map nullable value-type columns to plain value types instead of `T?`
    #[serde(default = "default_convert_nullable_fields")]
    pub convert_nullable_fields: bool,

    /// Set `IsDirty` from ORM property setters
    #[serde(default = "default_include_dirty_flag")]
    pub include_dirty_flag: bool,

    /// Derive ORM classes from `base_class_name`
    #[serde(default = "default_include_base_class")]
    pub include_base_class: bool,

    #[serde(default = "default_base_class_name")]
    pub base_class_name: String,

    /// SQL schema used in procedure and table references
    #[serde(default = "default_schema_name")]
    pub schema_name: String,
}

fn default_convert_nullable_fields() -> bool {
    defaults::CONVERT_NULLABLE_FIELDS
}
fn default_include_dirty_flag() -> bool {
    defaults::INCLUDE_DIRTY_FLAG
}
fn default_include_base_class() -> bool {
    defaults::INCLUDE_BASE_CLASS
}
fn default_base_class_name() -> String {
    defaults::BASE_CLASS_NAME.to_string()
}
fn default_schema_name() -> String {
    defaults::SCHEMA_NAME.to_string()
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            namespace_includes: Vec::new(),
            convert_nullable_fields: default_convert_nullable_fields(),
            include_dirty_flag: default_include_dirty_flag(),
            include_base_class: default_include_base_class(),
            base_class_name: default_base_class_name(),
            schema_name: default_schema_name(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    List(Vec<String>),
}

fn deserialize_namespace_includes<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::String(s) => split_namespace_list(&s),
        StringOrList::List(items) => items
            .iter()
            .flat_map(|item| split_namespace_list(item))
            .collect(),
    })
}

/// Split `"System.Linq; Acme.Data,Acme.Core"` into its namespaces.
pub fn split_namespace_list(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl GeneratorOptions {
    /// Check names that end up verbatim in generated source.
    pub fn validate(&self) -> Result<()> {
        if let Some(namespace) = &self.namespace {
            check_dotted_name("namespace", namespace)?;
        }
        for include in &self.namespace_includes {
            check_dotted_name("namespace_includes", include)?;
        }
        if self.include_base_class {
            check_identifier("base_class_name", &self.base_class_name)?;
        }
        if self.schema_name.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_name must not be empty".into(),
            ));
        }
        if self.schema_name.contains([']', '[']) {
            return Err(CodegenError::ValidationError(format!(
                "schema_name must not contain brackets: {}",
                self.schema_name
            )));
        }
        Ok(())
    }
}

fn check_identifier(option: &str, name: &str) -> Result<()> {
    if name.is_empty() || sanitize_identifier(name) != name || is_csharp_keyword(name) {
        return Err(CodegenError::ValidationError(format!(
            "{} is not a valid C# identifier: '{}'",
            option, name
        )));
    }
    Ok(())
}

fn check_dotted_name(option: &str, name: &str) -> Result<()> {
    name.split('.').try_for_each(|part| check_identifier(option, part))
}
