//! SQL Server type names and their coarse categories

use serde::{Deserialize, Serialize};

/// SQL Server column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlDataType {
    BigInt,
    Binary,
    Bit,
    Char,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    Structured,
    Text,
    Time,
    Timestamp,
    TinyInt,
    Udt,
    UniqueIdentifier,
    VarBinary,
    VarChar,
    Variant,
    Xml,
}

impl SqlDataType {
    /// Parse a raw catalog type name, ignoring case.
    ///
    /// `numeric` and `sql_variant` have no member of their own and map to
    /// `Decimal` and `Variant`. Anything else unknown yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim().to_ascii_lowercase();
        let ty = match name.as_str() {
            "numeric" => SqlDataType::Decimal,
            "sql_variant" => SqlDataType::Variant,
            "bigint" => SqlDataType::BigInt,
            "binary" => SqlDataType::Binary,
            "bit" => SqlDataType::Bit,
            "char" => SqlDataType::Char,
            "date" => SqlDataType::Date,
            "datetime" => SqlDataType::DateTime,
            "datetime2" => SqlDataType::DateTime2,
            "datetimeoffset" => SqlDataType::DateTimeOffset,
            "decimal" => SqlDataType::Decimal,
            "float" => SqlDataType::Float,
            "image" => SqlDataType::Image,
            "int" => SqlDataType::Int,
            "money" => SqlDataType::Money,
            "nchar" => SqlDataType::NChar,
            "ntext" => SqlDataType::NText,
            "nvarchar" => SqlDataType::NVarChar,
            "real" => SqlDataType::Real,
            "smalldatetime" => SqlDataType::SmallDateTime,
            "smallint" => SqlDataType::SmallInt,
            "smallmoney" => SqlDataType::SmallMoney,
            "structured" => SqlDataType::Structured,
            "text" => SqlDataType::Text,
            "time" => SqlDataType::Time,
            "timestamp" => SqlDataType::Timestamp,
            "tinyint" => SqlDataType::TinyInt,
            "udt" => SqlDataType::Udt,
            "uniqueidentifier" => SqlDataType::UniqueIdentifier,
            "varbinary" => SqlDataType::VarBinary,
            "varchar" => SqlDataType::VarChar,
            "variant" => SqlDataType::Variant,
            "xml" => SqlDataType::Xml,
            _ => return None,
        };
        Some(ty)
    }

    /// `SqlDbType` member name used in generated ADO.NET code.
    pub fn db_type_name(&self) -> &'static str {
        match self {
            SqlDataType::BigInt => "BigInt",
            SqlDataType::Binary => "Binary",
            SqlDataType::Bit => "Bit",
            SqlDataType::Char => "Char",
            SqlDataType::Date => "Date",
            SqlDataType::DateTime => "DateTime",
            SqlDataType::DateTime2 => "DateTime2",
            SqlDataType::DateTimeOffset => "DateTimeOffset",
            SqlDataType::Decimal => "Decimal",
            SqlDataType::Float => "Float",
            SqlDataType::Image => "Image",
            SqlDataType::Int => "Int",
            SqlDataType::Money => "Money",
            SqlDataType::NChar => "NChar",
            SqlDataType::NText => "NText",
            SqlDataType::NVarChar => "NVarChar",
            SqlDataType::Real => "Real",
            SqlDataType::SmallDateTime => "SmallDateTime",
            SqlDataType::SmallInt => "SmallInt",
            SqlDataType::SmallMoney => "SmallMoney",
            SqlDataType::Structured => "Structured",
            SqlDataType::Text => "Text",
            SqlDataType::Time => "Time",
            SqlDataType::Timestamp => "Timestamp",
            SqlDataType::TinyInt => "TinyInt",
            SqlDataType::Udt => "Udt",
            SqlDataType::UniqueIdentifier => "UniqueIdentifier",
            SqlDataType::VarBinary => "VarBinary",
            SqlDataType::VarChar => "VarChar",
            SqlDataType::Variant => "Variant",
            SqlDataType::Xml => "Xml",
        }
    }

    /// Whether a length applies to this type in a parameter declaration.
    pub fn has_length(&self) -> bool {
        matches!(
            self,
            SqlDataType::Binary
                | SqlDataType::Char
                | SqlDataType::NChar
                | SqlDataType::NVarChar
                | SqlDataType::VarBinary
                | SqlDataType::VarChar
        )
    }

    /// Whether precision and scale apply.
    pub fn has_precision(&self) -> bool {
        matches!(self, SqlDataType::Decimal)
    }
}

/// Coarse category used to pick equality, hashing and formatting code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Integer,
    Bool,
    String,
    Float,
    Time,
    Guid,
    BinaryData,
    Unknown,
}

impl From<Option<SqlDataType>> for BaseType {
    fn from(ty: Option<SqlDataType>) -> Self {
        let Some(ty) = ty else {
            return BaseType::Unknown;
        };
        match ty {
            SqlDataType::BigInt | SqlDataType::Int | SqlDataType::SmallInt | SqlDataType::TinyInt => {
                BaseType::Integer
            }
            SqlDataType::Bit => BaseType::Bool,
            SqlDataType::Char
            | SqlDataType::NChar
            | SqlDataType::NText
            | SqlDataType::NVarChar
            | SqlDataType::Text
            | SqlDataType::VarChar
            | SqlDataType::Xml => BaseType::String,
            SqlDataType::Decimal
            | SqlDataType::Float
            | SqlDataType::Money
            | SqlDataType::Real
            | SqlDataType::SmallMoney => BaseType::Float,
            SqlDataType::Date
            | SqlDataType::DateTime
            | SqlDataType::DateTime2
            | SqlDataType::DateTimeOffset
            | SqlDataType::SmallDateTime
            | SqlDataType::Time => BaseType::Time,
            SqlDataType::UniqueIdentifier => BaseType::Guid,
            SqlDataType::Binary
            | SqlDataType::Image
            | SqlDataType::Timestamp
            | SqlDataType::VarBinary => BaseType::BinaryData,
            SqlDataType::Structured | SqlDataType::Udt | SqlDataType::Variant => BaseType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_cased_names() {
        assert_eq!(SqlDataType::parse("numeric"), Some(SqlDataType::Decimal));
        assert_eq!(SqlDataType::parse("SQL_VARIANT"), Some(SqlDataType::Variant));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(SqlDataType::parse("NVarChar"), Some(SqlDataType::NVarChar));
        assert_eq!(SqlDataType::parse(" int "), Some(SqlDataType::Int));
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(SqlDataType::parse("geography"), None);
        assert_eq!(BaseType::from(None), BaseType::Unknown);
    }

    #[test]
    fn test_base_types() {
        let cases = [
            ("tinyint", BaseType::Integer),
            ("bit", BaseType::Bool),
            ("xml", BaseType::String),
            ("money", BaseType::Float),
            ("datetimeoffset", BaseType::Time),
            ("uniqueidentifier", BaseType::Guid),
            ("timestamp", BaseType::BinaryData),
            ("sql_variant", BaseType::Unknown),
        ];
        for (raw, expected) in cases {
            assert_eq!(BaseType::from(SqlDataType::parse(raw)), expected, "{}", raw);
        }
    }
}
