//! Catalog introspection queries and their row types
//!
//! Every query takes the schema name as `@P1`.

use dbforge::FromRow;

/// Columns of every base table, in table then ordinal order.
pub const COLUMNS_SQL: &str = r#"SELECT
    c.TABLE_NAME AS [table_name],
    c.COLUMN_NAME AS [column_name],
    c.DATA_TYPE AS [data_type],
    CAST(ISNULL(c.CHARACTER_MAXIMUM_LENGTH, 0) AS INT) AS [length],
    CAST(ISNULL(c.NUMERIC_PRECISION, 0) AS INT) AS [precision],
    CAST(ISNULL(c.NUMERIC_SCALE, 0) AS INT) AS [scale],
    CAST(CASE WHEN c.IS_NULLABLE = 'YES' THEN 1 ELSE 0 END AS BIT) AS [nullable],
    CAST(CASE WHEN pk.COLUMN_NAME IS NULL THEN 0 ELSE 1 END AS BIT) AS [is_pk],
    CAST(ISNULL(COLUMNPROPERTY(OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + QUOTENAME(c.TABLE_NAME)), c.COLUMN_NAME, 'IsIdentity'), 0) AS BIT) AS [is_identity],
    CAST(c.ORDINAL_POSITION AS INT) AS [ordinal]
FROM INFORMATION_SCHEMA.COLUMNS c
INNER JOIN INFORMATION_SCHEMA.TABLES t
    ON t.TABLE_SCHEMA = c.TABLE_SCHEMA AND t.TABLE_NAME = c.TABLE_NAME AND t.TABLE_TYPE = 'BASE TABLE'
LEFT JOIN (
    SELECT ku.TABLE_SCHEMA, ku.TABLE_NAME, ku.COLUMN_NAME
    FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
    INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE ku
        ON tc.CONSTRAINT_NAME = ku.CONSTRAINT_NAME AND tc.CONSTRAINT_SCHEMA = ku.CONSTRAINT_SCHEMA
    WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY'
) pk ON pk.TABLE_SCHEMA = c.TABLE_SCHEMA AND pk.TABLE_NAME = c.TABLE_NAME AND pk.COLUMN_NAME = c.COLUMN_NAME
WHERE c.TABLE_SCHEMA = @P1
ORDER BY c.TABLE_NAME, c.ORDINAL_POSITION"#;

/// Stored procedure bodies.
pub const PROCEDURES_SQL: &str = r#"SELECT o.name AS [name], m.definition AS [definition]
FROM sys.sql_modules m
INNER JOIN sys.objects o ON o.object_id = m.object_id
WHERE o.type = 'P' AND SCHEMA_NAME(o.schema_id) = @P1
ORDER BY o.name"#;

/// Scalar and table-valued function bodies.
pub const FUNCTIONS_SQL: &str = r#"SELECT o.name AS [name], m.definition AS [definition]
FROM sys.sql_modules m
INNER JOIN sys.objects o ON o.object_id = m.object_id
WHERE o.type IN ('FN', 'IF', 'TF') AND SCHEMA_NAME(o.schema_id) = @P1
ORDER BY o.name"#;

/// One row per foreign key column.
pub const CONSTRAINTS_SQL: &str = r#"SELECT
    fk.name AS [name],
    tp.name AS [fk_table],
    cp.name AS [fk_column],
    tr.name AS [pk_table],
    cr.name AS [pk_column]
FROM sys.foreign_keys fk
INNER JOIN sys.foreign_key_columns fkc ON fkc.constraint_object_id = fk.object_id
INNER JOIN sys.tables tp ON tp.object_id = fkc.parent_object_id
INNER JOIN sys.columns cp ON cp.object_id = fkc.parent_object_id AND cp.column_id = fkc.parent_column_id
INNER JOIN sys.tables tr ON tr.object_id = fkc.referenced_object_id
INNER JOIN sys.columns cr ON cr.object_id = fkc.referenced_object_id AND cr.column_id = fkc.referenced_column_id
WHERE SCHEMA_NAME(tp.schema_id) = @P1 AND SCHEMA_NAME(tr.schema_id) = @P1
ORDER BY fk.name, fkc.constraint_column_id"#;

/// Default constraint text per column.
pub const DEFAULTS_SQL: &str = r#"SELECT
    t.name AS [table_name],
    c.name AS [column_name],
    dc.definition AS [definition]
FROM sys.default_constraints dc
INNER JOIN sys.tables t ON t.object_id = dc.parent_object_id
INNER JOIN sys.columns c ON c.object_id = dc.parent_object_id AND c.column_id = dc.parent_column_id
WHERE SCHEMA_NAME(t.schema_id) = @P1
ORDER BY t.name, c.column_id"#;

#[derive(Debug, FromRow)]
pub(crate) struct ColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub length: i32,
    pub precision: i32,
    pub scale: i32,
    pub nullable: bool,
    pub is_pk: bool,
    pub is_identity: bool,
    pub ordinal: i32,
}

#[derive(Debug, FromRow)]
pub(crate) struct ModuleRow {
    pub name: String,
    /// NULL for encrypted modules
    pub definition: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct ConstraintRow {
    pub name: String,
    pub fk_table: String,
    pub fk_column: String,
    pub pk_table: String,
    pub pk_column: String,
}

#[derive(Debug, FromRow)]
pub(crate) struct DefaultRow {
    pub table_name: String,
    pub column_name: String,
    pub definition: Option<String>,
}
