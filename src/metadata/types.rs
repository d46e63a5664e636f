//! Rows reported by a [`MetadataSource`](super::MetadataSource).
//!
//! Catalog and schema are optional everywhere: databases without those
//! namespacing levels report `None`.

use serde::{Deserialize, Serialize};

/// Basic table information.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableInfo {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    /// Table name, case as reported by the database.
    pub name: String,
    /// Table type ("TABLE", "VIEW", ...).
    #[serde(rename = "type")]
    pub table_type: String,
}

impl TableInfo {
    pub fn is_view(&self) -> bool {
        self.table_type.eq_ignore_ascii_case("VIEW")
    }
}

/// Column information.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnInfo {
    /// Owning table name.
    #[serde(default)]
    pub table: String,
    /// Column name.
    pub name: String,
    /// Portable type code (JDBC numbering).
    pub type_code: i32,
    /// Database-specific type name.
    #[serde(default)]
    pub type_name: String,
    /// Whether NULL values are allowed.
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Declared size (length or precision).
    #[serde(default)]
    pub size: Option<i32>,
    /// Declared scale (decimal digits).
    #[serde(default)]
    pub scale: Option<i32>,
    /// Whether the database generates values for this column.
    #[serde(default)]
    pub autoincrement: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnInfo {
    /// A nullable column with no declared size.
    pub fn new(table: impl Into<String>, name: impl Into<String>, type_code: i32) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            type_code,
            type_name: String::new(),
            nullable: true,
            size: None,
            scale: None,
            autoincrement: false,
        }
    }
}

/// One column of a table's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrimaryKeyColumn {
    pub table: String,
    pub column: String,
    /// Position in the key (1-based).
    pub key_seq: u16,
    /// Constraint name.
    #[serde(default)]
    pub pk_name: Option<String>,
}

/// What a stored procedure reports about its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureKind {
    #[default]
    ResultUnknown,
    NoResult,
    ReturnsResult,
}

/// Stored procedure information.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcedureInfo {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default)]
    pub kind: ProcedureKind,
}

/// Role of a procedure column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureColumnKind {
    #[default]
    Unknown,
    In,
    InOut,
    Out,
    /// A column of a returned result set.
    Result,
    /// The procedure's return value.
    Return,
}

/// One parameter or result column of a stored procedure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcedureColumnInfo {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub procedure: String,
    /// Drivers may omit the name of return values.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: ProcedureColumnKind,
    /// Portable type code (JDBC numbering).
    pub type_code: i32,
    #[serde(default)]
    pub length: Option<i32>,
    #[serde(default)]
    pub scale: Option<i32>,
}
