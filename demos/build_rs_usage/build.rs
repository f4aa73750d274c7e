//! Build script that generates C# sources and procedure scripts from a T-SQL schema
//!
//! Configuration is read from [package.metadata.dbforge-codegen] in Cargo.toml

fn main() {
    dbforge_codegen::generate_from_cargo_metadata()
        .expect("Failed to generate dbforge code");
}
