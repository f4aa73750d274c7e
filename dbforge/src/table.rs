//! Tabular query results and typed mapping

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::traits::{FromRow, FromValue, Row};
use crate::value::Value;

/// What to do with a result column that no field binds to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingMode {
    /// Drop the column silently
    #[default]
    Lenient,
    /// Fail with [`Error::UnmappedColumn`]
    Strict,
}

/// One result set: column names plus rows of values.
///
/// The name to index lookup is built once when the table is created.
/// Column lookup is case-insensitive, the way SQL Server resolves names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    index: HashMap<String, usize>,
}

impl DataTable {
    /// Build a table. Rows shorter than the column list are padded with `NULL`.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            // first occurrence wins for duplicate names
            index.entry(name.to_lowercase()).or_insert(i);
        }
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self {
            columns,
            rows,
            index,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by (case-insensitive) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_lowercase()).copied()
    }

    pub fn row(&self, i: usize) -> Option<DataRow<'_>> {
        self.rows.get(i).map(|values| DataRow {
            table: self,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = DataRow<'_>> {
        self.rows.iter().map(move |values| DataRow {
            table: self,
            values,
        })
    }

    /// Map every row to `T`.
    ///
    /// In [`MappingMode::Strict`] any column not listed in
    /// `T::column_names()` fails the whole read before a single row is mapped.
    pub fn to_objects<T: FromRow>(&self, mode: MappingMode) -> Result<Vec<T>> {
        self.check_columns::<T>(mode)?;
        self.rows().map(|row| T::from_row(&row)).collect()
    }

    /// Map the first row to `T`, if any.
    pub fn first_object<T: FromRow>(&self, mode: MappingMode) -> Result<Option<T>> {
        self.check_columns::<T>(mode)?;
        self.row(0).map(|row| T::from_row(&row)).transpose()
    }

    /// First column of the first row.
    pub fn scalar<T: FromValue>(&self) -> Result<T> {
        let row = self
            .rows
            .first()
            .ok_or_else(|| Error::Query("Expected one row, found none".to_string()))?;
        let value = row
            .first()
            .cloned()
            .ok_or_else(|| Error::Query("Expected at least one column".to_string()))?;
        if value.is_null() && !T::NULLABLE {
            let column = self.columns.first().cloned().unwrap_or_default();
            return Err(Error::UnexpectedNull(column));
        }
        T::from_value(value)
    }

    fn check_columns<T: FromRow>(&self, mode: MappingMode) -> Result<()> {
        if mode == MappingMode::Lenient {
            return Ok(());
        }
        let known: HashSet<String> = T::column_names()
            .iter()
            .map(|c| c.to_lowercase())
            .collect();
        match self
            .columns
            .iter()
            .find(|c| !known.contains(&c.to_lowercase()))
        {
            Some(column) => Err(Error::UnmappedColumn {
                column: column.clone(),
                target: std::any::type_name::<T>(),
            }),
            None => Ok(()),
        }
    }
}

/// A borrowed row of a [`DataTable`].
#[derive(Debug, Clone, Copy)]
pub struct DataRow<'a> {
    table: &'a DataTable,
    values: &'a [Value],
}

impl DataRow<'_> {
    pub fn values(&self) -> &[Value] {
        self.values
    }
}

impl Row for DataRow<'_> {
    fn get_value(&self, column: &str) -> Result<Value> {
        self.table
            .column_index(column)
            .and_then(|i| self.values.get(i))
            .cloned()
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }

    fn has_column(&self, column: &str) -> bool {
        self.table.column_index(column).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RowExt;

    struct Game {
        id: i32,
        name: String,
        rating: Option<f64>,
    }

    impl FromRow for Game {
        fn from_row<R: Row>(row: &R) -> Result<Self> {
            Ok(Self {
                id: row.get("Id")?,
                name: row.get("Name")?,
                rating: row.get("Rating")?,
            })
        }

        fn column_names() -> &'static [&'static str] {
            &["Id", "Name", "Rating"]
        }
    }

    fn games() -> DataTable {
        DataTable::new(
            vec!["Id".into(), "Name".into(), "Rating".into()],
            vec![
                vec![Value::I32(1), "Tetris".into(), Value::F64(9.5)],
                vec![Value::I32(2), "Doom".into(), Value::Null],
            ],
        )
    }

    #[test]
    fn test_to_objects() {
        let rows: Vec<Game> = games().to_objects(MappingMode::Lenient).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].name, "Tetris");
        assert_eq!(rows[0].rating, Some(9.5));
        assert_eq!(rows[1].rating, None);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let table = games();
        let row = table.row(0).unwrap();
        assert_eq!(row.get::<i32>("ID").unwrap(), 1);
        assert!(matches!(row.get::<i32>("Missing"), Err(Error::ColumnNotFound(_))));
    }

    #[test]
    fn test_null_for_required_field() {
        let table = DataTable::new(
            vec!["Id".into(), "Name".into()],
            vec![vec![Value::I32(3), Value::Null]],
        );
        let err = table.to_objects::<Game>(MappingMode::Lenient).err().unwrap();
        assert!(matches!(err, Error::UnexpectedNull(ref c) if c == "Name"));
    }

    #[test]
    fn test_strict_rejects_extra_column() {
        let table = DataTable::new(
            vec!["Id".into(), "Name".into(), "Rating".into(), "Extra".into()],
            vec![vec![Value::I32(1), "x".into(), Value::Null, Value::I32(0)]],
        );
        assert_eq!(table.to_objects::<Game>(MappingMode::Lenient).unwrap().len(), 1);
        match table.to_objects::<Game>(MappingMode::Strict) {
            Err(Error::UnmappedColumn { column, .. }) => assert_eq!(column, "Extra"),
            other => panic!("expected UnmappedColumn, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_conversion_error_names_column() {
        let table = DataTable::new(
            vec!["Id".into(), "Name".into(), "Rating".into()],
            vec![vec!["one".into(), "x".into(), Value::Null]],
        );
        let err = table.to_objects::<Game>(MappingMode::Lenient).err().unwrap();
        assert!(matches!(err, Error::ColumnDecode { ref column, .. } if column == "Id"));
    }

    #[test]
    fn test_scalar() {
        let table = games();
        assert_eq!(table.scalar::<i64>().unwrap(), 1);
        let empty = DataTable::new(vec!["n".into()], vec![]);
        assert!(empty.scalar::<i32>().is_err());
        let null = DataTable::new(vec!["n".into()], vec![vec![Value::Null]]);
        assert_eq!(null.scalar::<Option<i32>>().unwrap(), None);
        assert!(matches!(null.scalar::<i32>(), Err(Error::UnexpectedNull(_))));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = DataTable::new(vec!["a".into(), "b".into()], vec![vec![Value::I32(1)]]);
        assert_eq!(table.row(0).unwrap().values(), &[Value::I32(1), Value::Null]);
    }
}
