//! Column metadata

use serde::{Deserialize, Serialize};

use super::sql_type::{BaseType, SqlDataType};

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlColumn {
    pub name: String,
    /// Name of the owning table
    pub table_name: String,
    /// Raw SQL type name as reported by the catalog, e.g. `nvarchar`
    pub data_type: String,
    /// Character or byte length; `-1` for `MAX`
    pub length: i32,
    pub precision: i32,
    pub scale: i32,
    pub nullable: bool,
    pub is_pk: bool,
    pub is_identity: bool,
    /// 1-based position in the table
    pub ordinal: i32,
    /// Default constraint text with wrapping characters removed
    pub default_value: Option<String>,
}

impl SqlColumn {
    /// Create a non-nullable column with no length, precision or default.
    pub fn new(table_name: &str, name: &str, data_type: &str, ordinal: i32) -> Self {
        Self {
            name: name.to_string(),
            table_name: table_name.to_string(),
            data_type: data_type.to_string(),
            length: 0,
            precision: 0,
            scale: 0,
            nullable: false,
            is_pk: false,
            is_identity: false,
            ordinal,
            default_value: None,
        }
    }

    /// Parsed SQL type; `None` when the raw name is not a known SQL Server type.
    pub fn sql_data_type(&self) -> Option<SqlDataType> {
        SqlDataType::parse(&self.data_type)
    }

    pub fn base_type(&self) -> BaseType {
        BaseType::from(self.sql_data_type())
    }

    /// Type as written in T-SQL, e.g. `NVARCHAR(50)`, `DECIMAL(10, 2)`.
    pub fn sql_type_declaration(&self) -> String {
        let upper = self.data_type.to_uppercase();
        match self.sql_data_type() {
            Some(ty) if ty.has_length() => {
                if self.length < 0 {
                    format!("{}(MAX)", upper)
                } else if self.length > 0 {
                    format!("{}({})", upper, self.length)
                } else {
                    upper
                }
            }
            Some(ty) if ty.has_precision() && self.precision > 0 => {
                format!("{}({}, {})", upper, self.precision, self.scale)
            }
            _ => upper,
        }
    }
}

/// Strip one layer of wrapping `(`/`'` ... `)`/`'` characters.
fn strip_wrapping(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'(' | b'\'')
        && matches!(bytes[bytes.len() - 1], b')' | b'\'')
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Clean catalog default-constraint text such as `((0))` or `('abc')`.
///
/// Two layers are stripped whether or not the second layer is really a
/// wrapper, so `('(x)')` becomes `(x)` but `((1))` also becomes `1` and a
/// short quoted literal like `('')` loses its quotes entirely.
pub fn clean_default_value(raw: &str) -> String {
    strip_wrapping(strip_wrapping(raw)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_default_one_layer() {
        assert_eq!(clean_default_value("(getdate())"), "getdate()");
        assert_eq!(clean_default_value("'abc'"), "abc");
    }

    #[test]
    fn test_clean_default_two_layers() {
        assert_eq!(clean_default_value("((0))"), "0");
        assert_eq!(clean_default_value("('N/A')"), "N/A");
    }

    #[test]
    fn test_clean_default_over_strips_short_values() {
        // the second pass removes the literal's own quotes
        assert_eq!(clean_default_value("('')"), "");
        assert_eq!(clean_default_value("x"), "x");
        assert_eq!(clean_default_value(""), "");
    }

    #[test]
    fn test_sql_type_declaration() {
        let mut col = SqlColumn::new("Game", "Name", "nvarchar", 2);
        col.length = 50;
        assert_eq!(col.sql_type_declaration(), "NVARCHAR(50)");
        col.length = -1;
        assert_eq!(col.sql_type_declaration(), "NVARCHAR(MAX)");

        let mut price = SqlColumn::new("Game", "Price", "decimal", 3);
        price.precision = 10;
        price.scale = 2;
        assert_eq!(price.sql_type_declaration(), "DECIMAL(10, 2)");
        assert_eq!(SqlColumn::new("Game", "Id", "int", 1).sql_type_declaration(), "INT");
    }
}
