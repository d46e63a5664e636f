//! Portable column types, numbered like `java.sql.Types`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A database-independent column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DbType {
    Bit,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    NChar,
    NVarchar,
    LongNVarchar,
    Clob,
    NClob,
    Date,
    Time,
    Timestamp,
    TimeWithTimezone,
    TimestampWithTimezone,
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    Array,
    Struct,
    SqlXml,
    Other,
}

/// (type, JDBC code, SQL name)
const TYPE_TABLE: &[(DbType, i32, &str)] = &[
    (DbType::Bit, -7, "BIT"),
    (DbType::Boolean, 16, "BOOLEAN"),
    (DbType::TinyInt, -6, "TINYINT"),
    (DbType::SmallInt, 5, "SMALLINT"),
    (DbType::Integer, 4, "INTEGER"),
    (DbType::BigInt, -5, "BIGINT"),
    (DbType::Real, 7, "REAL"),
    (DbType::Float, 6, "FLOAT"),
    (DbType::Double, 8, "DOUBLE"),
    (DbType::Numeric, 2, "NUMERIC"),
    (DbType::Decimal, 3, "DECIMAL"),
    (DbType::Char, 1, "CHAR"),
    (DbType::Varchar, 12, "VARCHAR"),
    (DbType::LongVarchar, -1, "LONGVARCHAR"),
    (DbType::NChar, -15, "NCHAR"),
    (DbType::NVarchar, -9, "NVARCHAR"),
    (DbType::LongNVarchar, -16, "LONGNVARCHAR"),
    (DbType::Clob, 2005, "CLOB"),
    (DbType::NClob, 2011, "NCLOB"),
    (DbType::Date, 91, "DATE"),
    (DbType::Time, 92, "TIME"),
    (DbType::Timestamp, 93, "TIMESTAMP"),
    (DbType::TimeWithTimezone, 2013, "TIME_WITH_TIMEZONE"),
    (DbType::TimestampWithTimezone, 2014, "TIMESTAMP_WITH_TIMEZONE"),
    (DbType::Binary, -2, "BINARY"),
    (DbType::VarBinary, -3, "VARBINARY"),
    (DbType::LongVarBinary, -4, "LONGVARBINARY"),
    (DbType::Blob, 2004, "BLOB"),
    (DbType::Array, 2003, "ARRAY"),
    (DbType::Struct, 2002, "STRUCT"),
    (DbType::SqlXml, 2009, "SQLXML"),
    (DbType::Other, 1111, "OTHER"),
];

impl DbType {
    /// Map a JDBC type code; `None` for codes with no portable equivalent.
    pub fn from_code(code: i32) -> Option<Self> {
        TYPE_TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(t, _, _)| *t)
    }

    pub fn code(self) -> i32 {
        self.entry().1
    }

    pub fn sql_name(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (DbType, i32, &'static str) {
        // Every variant has a row.
        TYPE_TABLE
            .iter()
            .find(|(t, _, _)| *t == self)
            .unwrap_or(&(DbType::Other, 1111, "OTHER"))
    }

    /// Types whose scale is meaningful.
    pub fn is_decimal(self) -> bool {
        matches!(
            self,
            DbType::Decimal | DbType::Numeric | DbType::Double | DbType::Float | DbType::Real
        )
    }

    pub fn is_character(self) -> bool {
        matches!(
            self,
            DbType::Char
                | DbType::Varchar
                | DbType::LongVarchar
                | DbType::NChar
                | DbType::NVarchar
                | DbType::LongNVarchar
                | DbType::Clob
                | DbType::NClob
        )
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}
