fn main() {
    // Generate every artifact for the tests
    // The output is only read by tests (via include_str!), so it won't
    // affect normal library compilation
    let out_dir = std::env::var("OUT_DIR").unwrap();
    dbforge_codegen::CodegenBuilder::new("../demos/example-schema.sql")
        .database_name("Arcade")
        .namespace("Acme.Arcade")
        .output_dir(&out_dir)
        .artifacts(&[
            dbforge_codegen::OutputKind::Poco,
            dbforge_codegen::OutputKind::Orm,
            dbforge_codegen::OutputKind::Dal,
            dbforge_codegen::OutputKind::Interface,
            dbforge_codegen::OutputKind::BaseClass,
            dbforge_codegen::OutputKind::XmlLoader,
            dbforge_codegen::OutputKind::JsonLoader,
            dbforge_codegen::OutputKind::StoredProcedures,
            dbforge_codegen::OutputKind::ConstraintScript,
        ])
        .generate()
        .expect("codegen failed");

    println!("cargo:rerun-if-changed=../demos/example-schema.sql");
}
