//! SQL Server to C# type mapping

use crate::config::GeneratorOptions;
use crate::error::{CodegenError, Result};
use crate::metadata::{SqlColumn, SqlDataType};

/// A C# type for code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClrType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Guid,
    Bytes,
    Object,
    /// `T?` over a value type
    Nullable(Box<ClrType>),
}

impl ClrType {
    /// Get the type string for code generation
    pub fn name(&self) -> String {
        match self {
            ClrType::Bool => "bool".to_string(),
            ClrType::Byte => "byte".to_string(),
            ClrType::Short => "short".to_string(),
            ClrType::Int => "int".to_string(),
            ClrType::Long => "long".to_string(),
            ClrType::Float => "float".to_string(),
            ClrType::Double => "double".to_string(),
            ClrType::Decimal => "decimal".to_string(),
            ClrType::String => "string".to_string(),
            ClrType::DateTime => "DateTime".to_string(),
            ClrType::DateTimeOffset => "DateTimeOffset".to_string(),
            ClrType::TimeSpan => "TimeSpan".to_string(),
            ClrType::Guid => "Guid".to_string(),
            ClrType::Bytes => "byte[]".to_string(),
            ClrType::Object => "object".to_string(),
            ClrType::Nullable(inner) => format!("{}?", inner.name()),
        }
    }

    /// Value types can be wrapped in `Nullable<T>`
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self,
            ClrType::String | ClrType::Bytes | ClrType::Object | ClrType::Nullable(_)
        )
    }

    /// Whether a variable of this type can hold `null`
    pub fn accepts_null(&self) -> bool {
        !self.is_value_type()
    }

    /// The type without a `Nullable` wrapper
    pub fn underlying(&self) -> &ClrType {
        match self {
            ClrType::Nullable(inner) => inner,
            other => other,
        }
    }
}

/// Result of mapping a column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMapping {
    Mapped(ClrType),
    /// No C# counterpart; carries the raw SQL type name
    Unmapped { sql_type: String },
}

/// Maps columns to C# types
pub struct TypeResolver;

impl TypeResolver {
    /// Map a column, wrapping nullable value types in `T?` unless
    /// `convert_nullable_fields` is set.
    pub fn resolve(column: &SqlColumn, options: &GeneratorOptions) -> TypeMapping {
        let Some(base) = column.sql_data_type().and_then(Self::base_clr_type) else {
            return TypeMapping::Unmapped {
                sql_type: column.data_type.clone(),
            };
        };

        if column.nullable && base.is_value_type() && !options.convert_nullable_fields {
            TypeMapping::Mapped(ClrType::Nullable(Box::new(base)))
        } else {
            TypeMapping::Mapped(base)
        }
    }

    /// Like [`resolve`](Self::resolve), failing on unmapped types.
    pub fn require(table: &str, column: &SqlColumn, options: &GeneratorOptions) -> Result<ClrType> {
        match Self::resolve(column, options) {
            TypeMapping::Mapped(ty) => Ok(ty),
            TypeMapping::Unmapped { sql_type } => Err(CodegenError::UnmappedType {
                table: table.to_string(),
                column: column.name.clone(),
                sql_type,
            }),
        }
    }

    fn base_clr_type(ty: SqlDataType) -> Option<ClrType> {
        let clr = match ty {
            SqlDataType::BigInt => ClrType::Long,
            SqlDataType::Int => ClrType::Int,
            SqlDataType::SmallInt => ClrType::Short,
            SqlDataType::TinyInt => ClrType::Byte,
            SqlDataType::Bit => ClrType::Bool,
            SqlDataType::Char
            | SqlDataType::NChar
            | SqlDataType::NText
            | SqlDataType::NVarChar
            | SqlDataType::Text
            | SqlDataType::VarChar
            | SqlDataType::Xml => ClrType::String,
            SqlDataType::Decimal | SqlDataType::Money | SqlDataType::SmallMoney => ClrType::Decimal,
            SqlDataType::Float => ClrType::Double,
            SqlDataType::Real => ClrType::Float,
            SqlDataType::Date
            | SqlDataType::DateTime
            | SqlDataType::DateTime2
            | SqlDataType::SmallDateTime => ClrType::DateTime,
            SqlDataType::DateTimeOffset => ClrType::DateTimeOffset,
            SqlDataType::Time => ClrType::TimeSpan,
            SqlDataType::UniqueIdentifier => ClrType::Guid,
            SqlDataType::Binary
            | SqlDataType::Image
            | SqlDataType::Timestamp
            | SqlDataType::VarBinary => ClrType::Bytes,
            SqlDataType::Variant => ClrType::Object,
            SqlDataType::Structured | SqlDataType::Udt => return None,
        };
        Some(clr)
    }
}
