//! FromValue trait for converting database values to Rust types

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Trait for types that can be constructed from a database value.
///
/// Implemented for the scalar types SQL Server returns and for `Option<T>`.
/// Enums get an implementation through `#[derive(DbEnum)]`.
pub trait FromValue: Sized {
    /// Whether a SQL `NULL` is an acceptable input for this type.
    ///
    /// Only `Option<T>` and [`Value`] accept `NULL`; for every other type a
    /// `NULL` is reported as [`Error::UnexpectedNull`] by [`RowExt::get`](crate::RowExt::get).
    const NULLABLE: bool = false;

    /// Convert a database value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, value: &Value) -> Error {
    Error::TypeConversion {
        expected,
        actual: value.type_name().to_string(),
    }
}

/// Widen any integral value to `i64`.
fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::U8(v) => Some(i64::from(*v)),
        Value::I16(v) => Some(i64::from(*v)),
        Value::I32(v) => Some(i64::from(*v)),
        Value::I64(v) => Some(*v),
        Value::Bool(v) => Some(i64::from(*v)),
        Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
        _ => None,
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    let n = as_i64(&value).ok_or_else(|| mismatch(stringify!($ty), &value))?;
                    <$ty>::try_from(n).map_err(|_| Error::TypeConversion {
                        expected: stringify!($ty),
                        actual: format!("{}({}) out of range", value.type_name(), n),
                    })
                }
            }
        )*
    };
}

impl_integer!(u8, i16, i32, i64, u16, u32, u64);

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => as_i64(&other)
                .map(|n| n != 0)
                .ok_or_else(|| mismatch("bool", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F32(v) => Ok(v),
            Value::F64(v) => Ok(v as f32),
            Value::Decimal(d) => d.to_f32().ok_or_else(|| mismatch("f32", &value)),
            other => as_i64(&other)
                .map(|n| n as f32)
                .ok_or_else(|| mismatch("f32", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F32(v) => Ok(f64::from(v)),
            Value::F64(v) => Ok(v),
            Value::Decimal(d) => d.to_f64().ok_or_else(|| mismatch("f64", &value)),
            other => as_i64(&other)
                .map(|n| n as f64)
                .ok_or_else(|| mismatch("f64", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Guid(v) => Ok(v.to_string()),
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| Error::TypeConversion {
                expected: "utf8 string",
                actual: format!("invalid utf8: {}", e),
            }),
            _ => Err(mismatch("string", &value)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            _ => Err(mismatch("bytes", &value)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Guid(v) => Ok(v),
            Value::String(ref s) => Uuid::parse_str(s).map_err(|_| Error::TypeConversion {
                expected: "guid",
                actual: format!("invalid guid string: {}", s),
            }),
            _ => Err(mismatch("guid", &value)),
        }
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::String(ref s) => s.parse().map_err(|_| Error::TypeConversion {
                expected: "decimal",
                actual: format!("invalid decimal string: {}", s),
            }),
            other => as_i64(&other)
                .map(Decimal::from)
                .ok_or_else(|| mismatch("decimal", &other)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(v),
            Value::DateTime(v) => Ok(v.date()),
            _ => Err(mismatch("date", &value)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::Date(v) => Ok(v.and_time(NaiveTime::default())),
            Value::DateTimeOffset(v) => Ok(v.naive_local()),
            _ => Err(mismatch("datetime", &value)),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(v) => Ok(v),
            Value::DateTime(v) => Ok(v.time()),
            _ => Err(mismatch("time", &value)),
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTimeOffset(v) => Ok(v),
            _ => Err(mismatch("datetimeoffset", &value)),
        }
    }
}

impl FromValue for Value {
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

// NULL becomes None; anything else goes through T
impl<T: FromValue> FromValue for Option<T> {
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening_and_narrowing() {
        assert_eq!(i64::from_value(Value::I32(42)).unwrap(), 42);
        assert_eq!(i32::from_value(Value::U8(7)).unwrap(), 7);
        assert_eq!(i16::from_value(Value::I64(-3)).unwrap(), -3);
        assert!(matches!(
            u8::from_value(Value::I32(300)),
            Err(Error::TypeConversion { expected: "u8", .. })
        ));
    }

    #[test]
    fn test_bool_from_bit_and_integer() {
        assert!(bool::from_value(Value::Bool(true)).unwrap());
        assert!(bool::from_value(Value::I32(1)).unwrap());
        assert!(!bool::from_value(Value::U8(0)).unwrap());
        assert!(bool::from_value(Value::String("yes".into())).is_err());
    }

    #[test]
    fn test_string_rejects_numbers() {
        let err = String::from_value(Value::I32(1)).unwrap_err();
        assert!(err.to_string().contains("expected string"));
    }

    #[test]
    fn test_option_nullable() {
        assert!(<Option<i32> as FromValue>::NULLABLE);
        assert!(!<i32 as FromValue>::NULLABLE);
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(Value::I16(5)).unwrap(), Some(5));
    }

    #[test]
    fn test_guid_from_string() {
        let id = Uuid::parse_str("6f9619ff-8b86-d011-b42d-00c04fc964ff").unwrap();
        assert_eq!(Uuid::from_value(Value::String(id.to_string())).unwrap(), id);
        assert_eq!(String::from_value(Value::Guid(id)).unwrap(), id.to_string());
    }

    #[test]
    fn test_decimal_conversions() {
        let d = Decimal::new(1250, 2);
        assert_eq!(Decimal::from_value(Value::Decimal(d)).unwrap(), d);
        assert_eq!(f64::from_value(Value::Decimal(d)).unwrap(), 12.5);
        assert_eq!(i64::from_value(Value::Decimal(Decimal::new(400, 2))).unwrap(), 4);
        assert!(i64::from_value(Value::Decimal(d)).is_err());
    }

    #[test]
    fn test_date_to_datetime() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let dt = NaiveDateTime::from_value(Value::Date(date)).unwrap();
        assert_eq!(dt.date(), date);
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }
}
