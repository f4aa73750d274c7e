//! Derive macros for dbforge
//!
//! This crate provides the following derive macros:
//! - `FromRow` - Maps result rows to Rust structs
//! - `DbEnum` - Reads and writes fieldless enums as integer or name values
//!
//! These macros are re-exported from the `dbforge` crate, so users typically
//! don't need to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod db_enum;
mod from_row;

/// Derive macro for mapping result rows to Rust structs.
///
/// This macro generates an implementation of the `FromRow` trait: a fixed
/// column to field binding table, checked at compile time.
///
/// # Attributes
///
/// - `#[dbforge(rename = "ColumnName")]` - Use a different column name for this field
/// - `#[dbforge(skip)]` - Never read this field; it is set to `Default::default()`
/// - `#[dbforge(default)]` - Read the column if present and not NULL, otherwise use `Default::default()`
///
/// # Example
///
/// ```ignore
/// use dbforge::FromRow;
///
/// #[derive(FromRow)]
/// pub struct Game {
///     #[dbforge(rename = "Id")]
///     pub id: i32,
///     #[dbforge(rename = "Name")]
///     pub name: String,
///     #[dbforge(rename = "Disabled", default)]
///     pub disabled: bool,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(dbforge))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::derive_from_row_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive macro for storing fieldless enums in database columns.
///
/// Generates `FromValue` and `ToValue`. Reading accepts either an integer
/// (matched against the variant discriminants) or a string (matched against
/// the variant names, ignoring ASCII case). Writing produces the discriminant.
///
/// # Attributes
///
/// - `#[dbforge(rename = "Label")]` - Match this name instead of the variant identifier
///
/// # Example
///
/// ```ignore
/// use dbforge::DbEnum;
///
/// #[derive(DbEnum, Clone, Copy)]
/// pub enum Genre {
///     Action = 1,
///     Puzzle = 2,
///     #[dbforge(rename = "Role Playing")]
///     RolePlaying = 3,
/// }
/// ```
#[proc_macro_derive(DbEnum, attributes(dbforge))]
pub fn derive_db_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    db_enum::derive_db_enum_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
