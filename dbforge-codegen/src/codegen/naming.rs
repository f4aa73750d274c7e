//! Naming utilities for code generation

use heck::{ToLowerCamelCase, ToPascalCase};
use std::collections::HashSet;

/// Maps SQL identifiers to C# identifiers.
///
/// Generators only see names through this trait, so a project can plug in
/// its own conventions.
pub trait NameFormatter: Send + Sync {
    /// Class name for a table, e.g. `game_score` -> `GameScore`
    fn class_name(&self, table: &str) -> String;

    /// Property name for a column of the class `class_name`
    fn property_name(&self, column: &str, class_name: &str) -> String;

    /// Private backing field for a property
    fn field_name(&self, property: &str) -> String;

    /// Method or constructor parameter for a property
    fn parameter_name(&self, property: &str) -> String;

    /// Root namespace for a database
    fn namespace(&self, database: &str) -> String;
}

/// PascalCase types and properties, `_camelCase` fields, `camelCase` parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNameFormatter;

impl NameFormatter for DefaultNameFormatter {
    fn class_name(&self, table: &str) -> String {
        identifier_or(&sanitize_identifier(table).to_pascal_case(), "Table")
    }

    fn property_name(&self, column: &str, class_name: &str) -> String {
        let name = identifier_or(&sanitize_identifier(column).to_pascal_case(), "Column");
        // a member may not share its enclosing type's name
        if name == class_name {
            format!("{}Value", name)
        } else {
            name
        }
    }

    fn field_name(&self, property: &str) -> String {
        format!("_{}", property.to_lower_camel_case())
    }

    fn parameter_name(&self, property: &str) -> String {
        escape_keyword(&property.to_lower_camel_case())
    }

    fn namespace(&self, database: &str) -> String {
        identifier_or(&sanitize_identifier(database).to_pascal_case(), "Database")
    }
}

pub(crate) fn identifier_or(name: &str, fallback: &str) -> String {
    let name = sanitize_identifier(name);
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// Make a legal C# identifier out of arbitrary text.
///
/// Every character other than a letter, digit or underscore is removed, and
/// a leading digit gets an `N` prefix: `"Order Id!"` becomes `OrderId`,
/// `"3D Games"` becomes `N3DGames`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, 'N');
    }
    name
}

/// `name`, or `name2`, `name3`, ... when already taken.
///
/// Names are compared ignoring case: T-SQL variables are case-insensitive,
/// and camelCase fields derived from two properties may otherwise clash.
pub fn unique_name(name: String, used: &mut HashSet<String>) -> String {
    let mut candidate = name.clone();
    let mut n = 1;
    while used.contains(&candidate.to_lowercase()) {
        n += 1;
        candidate = format!("{}{}", name, n);
    }
    used.insert(candidate.to_lowercase());
    candidate
}

/// Prefix C# keywords with `@`.
pub fn escape_keyword(name: &str) -> String {
    if is_csharp_keyword(name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}

/// Check if a name is a C# reserved keyword
pub fn is_csharp_keyword(name: &str) -> bool {
    matches!(
        name,
        "abstract"
            | "as"
            | "base"
            | "bool"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "checked"
            | "class"
            | "const"
            | "continue"
            | "decimal"
            | "default"
            | "delegate"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "event"
            | "explicit"
            | "extern"
            | "false"
            | "finally"
            | "fixed"
            | "float"
            | "for"
            | "foreach"
            | "goto"
            | "if"
            | "implicit"
            | "in"
            | "int"
            | "interface"
            | "internal"
            | "is"
            | "lock"
            | "long"
            | "namespace"
            | "new"
            | "null"
            | "object"
            | "operator"
            | "out"
            | "override"
            | "params"
            | "private"
            | "protected"
            | "public"
            | "readonly"
            | "ref"
            | "return"
            | "sbyte"
            | "sealed"
            | "short"
            | "sizeof"
            | "stackalloc"
            | "static"
            | "string"
            | "struct"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "uint"
            | "ulong"
            | "unchecked"
            | "unsafe"
            | "ushort"
            | "using"
            | "virtual"
            | "void"
            | "volatile"
            | "while"
    )
}
