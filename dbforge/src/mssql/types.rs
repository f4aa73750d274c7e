//! Conversions between dbforge values and tiberius column data

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::table::DataTable;
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tiberius::{ColumnData, FromSql, ToSql};

impl ToSql for Value {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            Value::Null => ColumnData::String(None),
            Value::Bool(v) => v.to_sql(),
            Value::U8(v) => v.to_sql(),
            Value::I16(v) => v.to_sql(),
            Value::I32(v) => v.to_sql(),
            Value::I64(v) => v.to_sql(),
            Value::F32(v) => v.to_sql(),
            Value::F64(v) => v.to_sql(),
            Value::String(v) => ColumnData::String(Some(Cow::Borrowed(v.as_str()))),
            Value::Bytes(v) => ColumnData::Binary(Some(Cow::Borrowed(v.as_slice()))),
            Value::Guid(v) => v.to_sql(),
            Value::Decimal(v) => v.to_sql(),
            Value::Date(v) => v.to_sql(),
            Value::Time(v) => v.to_sql(),
            Value::DateTime(v) => v.to_sql(),
            Value::DateTimeOffset(v) => v.to_sql(),
        }
    }
}

/// T-SQL type used to declare a local variable holding `value`.
pub(crate) fn declared_type(value: &Value) -> String {
    match value {
        Value::Null => "SQL_VARIANT".to_string(),
        Value::Bool(_) => "BIT".to_string(),
        Value::U8(_) => "TINYINT".to_string(),
        Value::I16(_) => "SMALLINT".to_string(),
        Value::I32(_) => "INT".to_string(),
        Value::I64(_) => "BIGINT".to_string(),
        Value::F32(_) => "REAL".to_string(),
        Value::F64(_) => "FLOAT".to_string(),
        Value::String(_) => "NVARCHAR(MAX)".to_string(),
        Value::Bytes(_) => "VARBINARY(MAX)".to_string(),
        Value::Guid(_) => "UNIQUEIDENTIFIER".to_string(),
        Value::Decimal(d) => format!("DECIMAL(38, {})", d.scale()),
        Value::Date(_) => "DATE".to_string(),
        Value::Time(_) => "TIME".to_string(),
        Value::DateTime(_) => "DATETIME2".to_string(),
        Value::DateTimeOffset(_) => "DATETIMEOFFSET".to_string(),
    }
}

/// Convert one cell.
///
/// Types without a dbforge representation (XML, UDTs) abort the read.
pub(crate) fn from_column_data(column: &str, data: ColumnData<'static>) -> Result<Value> {
    let value = match &data {
        ColumnData::U8(v) => v.map(Value::U8),
        ColumnData::I16(v) => v.map(Value::I16),
        ColumnData::I32(v) => v.map(Value::I32),
        ColumnData::I64(v) => v.map(Value::I64),
        ColumnData::F32(v) => v.map(Value::F32),
        ColumnData::F64(v) => v.map(Value::F64),
        ColumnData::Bit(v) => v.map(Value::Bool),
        ColumnData::String(v) => v.as_ref().map(|s| Value::String(s.to_string())),
        ColumnData::Guid(v) => v.map(Value::Guid),
        ColumnData::Binary(v) => v.as_ref().map(|b| Value::Bytes(b.to_vec())),
        ColumnData::Numeric(_) => Decimal::from_sql(&data)?.map(Value::Decimal),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(&data)?.map(Value::DateTime)
        }
        ColumnData::Date(_) => NaiveDate::from_sql(&data)?.map(Value::Date),
        ColumnData::Time(_) => NaiveTime::from_sql(&data)?.map(Value::Time),
        ColumnData::DateTimeOffset(_) => {
            DateTime::<FixedOffset>::from_sql(&data)?.map(Value::DateTimeOffset)
        }
        #[allow(unreachable_patterns)]
        other => {
            return Err(Error::UnsupportedType {
                column: column.to_string(),
                sql_type: column_data_name(other).to_string(),
            })
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

fn column_data_name(data: &ColumnData<'_>) -> &'static str {
    match data {
        ColumnData::Xml(_) => "xml",
        _ => "unknown",
    }
}

/// Collect tiberius rows of one result set into a [`DataTable`].
pub(crate) fn into_table(rows: Vec<tiberius::Row>) -> Result<DataTable> {
    let columns: Vec<String> = match rows.first() {
        Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
        None => return Ok(DataTable::default()),
    };

    let mut values = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = Vec::with_capacity(columns.len());
        for (name, data) in columns.iter().zip(row.into_iter()) {
            cells.push(from_column_data(name, data)?);
        }
        values.push(cells);
    }
    Ok(DataTable::new(columns, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cells() {
        assert_eq!(from_column_data("a", ColumnData::I32(None)).unwrap(), Value::Null);
        assert_eq!(from_column_data("a", ColumnData::String(None)).unwrap(), Value::Null);
    }

    #[test]
    fn test_scalar_cells() {
        assert_eq!(
            from_column_data("a", ColumnData::Bit(Some(true))).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            from_column_data("a", ColumnData::String(Some(Cow::Owned("Doom".into())))).unwrap(),
            Value::String("Doom".into())
        );
    }

    #[test]
    fn test_xml_is_unsupported() {
        let err = from_column_data("Doc", ColumnData::Xml(None)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { ref column, .. } if column == "Doc"));
    }

    #[test]
    fn test_value_to_sql() {
        assert!(matches!(Value::Null.to_sql(), ColumnData::String(None)));
        assert!(matches!(Value::I64(9).to_sql(), ColumnData::I64(Some(9))));
    }

    #[test]
    fn test_declared_type() {
        assert_eq!(declared_type(&Value::I32(1)), "INT");
        assert_eq!(declared_type(&Value::Decimal(Decimal::new(125, 2))), "DECIMAL(38, 2)");
    }

    #[test]
    fn test_empty_result_set() {
        let table = into_table(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
