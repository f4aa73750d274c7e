//! Code generation module

mod base_class_generator;
mod code_generator;
mod constraint_generator;
pub mod csharp;
mod dal_generator;
mod enum_generator;
mod interface_generator;
mod loader_generator;
mod naming;
mod orm_generator;
mod output;
mod poco_generator;
mod procedure_generator;
mod table_context;
mod type_resolver;

pub use code_generator::*;
pub use enum_generator::{enum_columns, enum_file, enum_query, EnumRow};
pub use loader_generator::LoaderFormat;
pub use naming::*;
pub use orm_generator::{hash_prime, HASH_PRIMES};
pub use output::*;
pub use table_context::{ColumnInfo, ProcedureAction, TableContext};
pub use type_resolver::*;
