//! Configuration for dbforge-codegen

pub mod defaults;
mod options;
mod settings;

pub use options::{split_namespace_list, GeneratorOptions};
pub use settings::CodegenConfig;
