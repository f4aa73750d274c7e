//! Main code generator orchestrator

use dbforge::Database;
use tracing::{debug, info};

use crate::config::GeneratorOptions;
use crate::error::{CodegenError, Result};
use crate::metadata::{SqlDatabase, SqlTable};

use super::base_class_generator::generate_base_class;
use super::constraint_generator::generate_constraint_script;
use super::dal_generator::generate_dal;
use super::enum_generator::generate_enum;
use super::interface_generator::generate_interface;
use super::loader_generator::{generate_loader, LoaderFormat};
use super::naming::{DefaultNameFormatter, NameFormatter};
use super::orm_generator::generate_orm;
use super::output::{OutputKind, OutputObject};
use super::poco_generator::generate_poco;
use super::procedure_generator::generate_procedures;
use super::table_context::{root_namespace, TableContext};

/// Turns schema metadata into C# and T-SQL files.
///
/// Options are validated once, when the generator is built. Every method is
/// a pure function of its arguments apart from [`generate_enum`](Self::generate_enum),
/// which reads the lookup rows from the database.
pub struct CodeGenerator<'a> {
    options: &'a GeneratorOptions,
    formatter: Box<dyn NameFormatter>,
}

impl<'a> CodeGenerator<'a> {
    /// Create a generator using [`DefaultNameFormatter`]
    pub fn new(options: &'a GeneratorOptions) -> Result<Self> {
        Self::with_formatter(options, Box::new(DefaultNameFormatter))
    }

    /// Create a generator with custom naming
    pub fn with_formatter(
        options: &'a GeneratorOptions,
        formatter: Box<dyn NameFormatter>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, formatter })
    }

    pub fn options(&self) -> &GeneratorOptions {
        self.options
    }

    pub fn formatter(&self) -> &dyn NameFormatter {
        self.formatter.as_ref()
    }

    /// Resolve the names and types of a table
    pub fn context<'t>(&'t self, table: &'t SqlTable) -> Result<TableContext<'t>> {
        TableContext::new(table, self.options, self.formatter.as_ref())
    }

    /// Generate one artifact for one table.
    ///
    /// `ConstraintScript` and `Enum` need more than a table; use
    /// [`generate_constraint_script`](Self::generate_constraint_script) and
    /// [`generate_enum`](Self::generate_enum) for those.
    pub fn generate(&self, kind: OutputKind, table: &SqlTable) -> Result<OutputObject> {
        if kind == OutputKind::BaseClass {
            return Ok(self.generate_base_class(&table.database_name));
        }
        let ctx = self.context(table)?;
        let output = match kind {
            OutputKind::Poco => generate_poco(&ctx),
            OutputKind::Orm => generate_orm(&ctx),
            OutputKind::Dal => generate_dal(&ctx),
            OutputKind::Interface => generate_interface(&ctx),
            OutputKind::XmlLoader => generate_loader(&ctx, LoaderFormat::Xml),
            OutputKind::JsonLoader => generate_loader(&ctx, LoaderFormat::Json),
            OutputKind::StoredProcedures => generate_procedures(&ctx),
            OutputKind::BaseClass | OutputKind::ConstraintScript | OutputKind::Enum => {
                return Err(CodegenError::ValidationError(format!(
                    "{} is not generated from a single table",
                    kind
                )));
            }
        };
        debug!("Generated {}/{}", output.output_path, output.file_name);
        Ok(output)
    }

    /// Generate one artifact for a table looked up by name.
    ///
    /// Returns `Ok(None)` when the database has no such table.
    pub fn generate_named(
        &self,
        database: &SqlDatabase,
        table_name: &str,
        kind: OutputKind,
    ) -> Result<Option<OutputObject>> {
        match database.table(table_name) {
            Some(table) => self.generate(kind, table).map(Some),
            None => {
                debug!("No table named {} in {}, nothing generated", table_name, database.name);
                Ok(None)
            }
        }
    }

    /// Generate the per-table artifacts among `kinds` for one table
    pub fn generate_table(&self, table: &SqlTable, kinds: &[OutputKind]) -> Result<Vec<OutputObject>> {
        kinds
            .iter()
            .filter(|kind| kind.is_per_table())
            .map(|kind| self.generate(*kind, table))
            .collect()
    }

    /// Generate `kinds` for `tables` of `database`, plus the base class and
    /// constraint script once when requested.
    pub fn generate_database(
        &self,
        database: &SqlDatabase,
        tables: &[&SqlTable],
        kinds: &[OutputKind],
    ) -> Result<Vec<OutputObject>> {
        let mut outputs = Vec::new();
        for table in tables {
            outputs.extend(self.generate_table(table, kinds)?);
        }
        if kinds.contains(&OutputKind::BaseClass) {
            outputs.push(self.generate_base_class(&database.name));
        }
        if kinds.contains(&OutputKind::ConstraintScript) {
            outputs.push(self.generate_constraint_script(database));
        }
        info!(
            "Generated {} files for {} tables of {}",
            outputs.len(),
            tables.len(),
            database.name
        );
        Ok(outputs)
    }

    /// Generate the ORM base class for a database
    pub fn generate_base_class(&self, database_name: &str) -> OutputObject {
        let root = root_namespace(self.options, database_name, self.formatter.as_ref());
        generate_base_class(&root, self.options)
    }

    /// Script the foreign keys of a database
    pub fn generate_constraint_script(&self, database: &SqlDatabase) -> OutputObject {
        generate_constraint_script(database, self.options)
    }

    /// Generate an enum from the rows of a lookup table
    pub async fn generate_enum<D: Database>(&self, db: &D, table: &SqlTable) -> Result<OutputObject> {
        generate_enum(db, table, self.options, self.formatter.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::table_context::fixtures;
    use crate::metadata::SqlConstraint;

    fn database() -> SqlDatabase {
        let mut db = SqlDatabase::new("Arcade", "");
        for table in [fixtures::game(), fixtures::mixed(), fixtures::audit_log()] {
            db.tables.insert(table.name.clone(), table);
        }
        db.add_constraint(SqlConstraint {
            name: "FK_Score_Game".into(),
            fk_table: "Score".into(),
            fk_column: "GameId".into(),
            pk_table: "Game".into(),
            pk_column: "Id".into(),
        });
        db
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = GeneratorOptions {
            namespace: Some("not valid".into()),
            ..Default::default()
        };
        assert!(CodeGenerator::new(&options).is_err());
    }

    #[test]
    fn test_generate_named_unknown_table() {
        let options = GeneratorOptions::default();
        let generator = CodeGenerator::new(&options).unwrap();
        let db = database();
        assert!(generator
            .generate_named(&db, "Missing", OutputKind::Poco)
            .unwrap()
            .is_none());
        let out = generator
            .generate_named(&db, "Game", OutputKind::Poco)
            .unwrap()
            .unwrap();
        assert_eq!(out.file_name, "Game.cs");
    }

    #[test]
    fn test_generate_table_skips_database_kinds() {
        let options = GeneratorOptions::default();
        let generator = CodeGenerator::new(&options).unwrap();
        let outputs = generator
            .generate_table(&fixtures::game(), &OutputKind::ALL)
            .unwrap();
        let kinds: Vec<_> = outputs.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OutputKind::Poco,
                OutputKind::Orm,
                OutputKind::Dal,
                OutputKind::Interface,
                OutputKind::XmlLoader,
                OutputKind::JsonLoader,
                OutputKind::StoredProcedures,
            ]
        );
    }

    #[test]
    fn test_generate_database() {
        let options = GeneratorOptions::default();
        let generator = CodeGenerator::new(&options).unwrap();
        let db = database();
        let tables: Vec<&SqlTable> = db.tables.values().collect();
        let outputs = generator
            .generate_database(
                &db,
                &tables,
                &[OutputKind::Poco, OutputKind::BaseClass, OutputKind::ConstraintScript],
            )
            .unwrap();
        let paths: Vec<_> = outputs.iter().map(|o| o.relative_path()).collect();
        assert_eq!(
            paths,
            vec![
                std::path::PathBuf::from("Poco/Game.cs"),
                "Poco/Score.cs".into(),
                "Poco/AuditLog.cs".into(),
                "Orm/EntityBase.cs".into(),
                "Sql/Constraints.sql".into(),
            ]
        );
    }

    #[test]
    fn test_single_table_kind_errors() {
        let options = GeneratorOptions::default();
        let generator = CodeGenerator::new(&options).unwrap();
        assert!(generator
            .generate(OutputKind::ConstraintScript, &fixtures::game())
            .is_err());
        assert_eq!(
            generator
                .generate(OutputKind::BaseClass, &fixtures::game())
                .unwrap()
                .file_name,
            "EntityBase.cs"
        );
    }

    #[test]
    fn test_unmapped_type_is_an_error() {
        let options = GeneratorOptions::default();
        let generator = CodeGenerator::new(&options).unwrap();
        let mut table = fixtures::game();
        table.add_column(crate::metadata::SqlColumn::new("Game", "Venue", "geography", 4));
        let err = generator.generate(OutputKind::Poco, &table).unwrap_err();
        assert!(matches!(err, CodegenError::UnmappedType { .. }));
    }

    #[test]
    fn test_regeneration_is_identical() {
        let options = GeneratorOptions::default();
        let generator = CodeGenerator::new(&options).unwrap();
        let table = fixtures::mixed();
        for kind in OutputKind::ALL.iter().filter(|k| k.is_per_table()) {
            assert_eq!(
                generator.generate(*kind, &table).unwrap(),
                generator.generate(*kind, &table).unwrap()
            );
        }
    }

    struct UpperFormatter;

    impl NameFormatter for UpperFormatter {
        fn class_name(&self, table: &str) -> String {
            table.to_uppercase()
        }
        fn property_name(&self, column: &str, _class_name: &str) -> String {
            column.to_uppercase()
        }
        fn field_name(&self, property: &str) -> String {
            format!("m_{}", property)
        }
        fn parameter_name(&self, property: &str) -> String {
            format!("p_{}", property)
        }
        fn namespace(&self, database: &str) -> String {
            database.to_uppercase()
        }
    }

    #[test]
    fn test_custom_formatter() {
        let options = GeneratorOptions::default();
        let generator = CodeGenerator::with_formatter(&options, Box::new(UpperFormatter)).unwrap();
        let out = generator.generate(OutputKind::Poco, &fixtures::game()).unwrap();
        assert_eq!(out.file_name, "GAME.cs");
        assert!(out.body.contains("namespace ARCADE\n"));
        assert!(out.body.contains("public string NAME { get; set; }"));
    }
}
