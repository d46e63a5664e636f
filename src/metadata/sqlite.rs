//! SQLite metadata through the `sqlite_master` table and table-valued pragmas.
//!
//! SQLite has no catalogs. Attached databases play the role of schemas; the
//! `main` database is the default scope and is reported with no schema name.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use super::source::MetadataSource;
use super::types::*;
use super::{qualified_name, ExportedKey, MetadataError, MetadataResult};
use crate::model::DbType;

const MAIN_DATABASE: &str = "main";

/// A [`MetadataSource`] reading a SQLite database.
pub struct SqliteMetadataSource {
    conn: Connection,
}

impl SqliteMetadataSource {
    /// Open an existing database file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> MetadataResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection (e.g. an in-memory test database).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn database_names(&self) -> MetadataResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_database_list ORDER BY seq")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// The attached database addressed by (catalog, schema).
    fn resolve_database(&self, catalog: Option<&str>, schema: Option<&str>) -> MetadataResult<String> {
        if let Some(catalog) = catalog {
            return Err(MetadataError::UnknownCatalog(catalog.to_string()));
        }
        match schema {
            None => Ok(MAIN_DATABASE.to_string()),
            Some(schema) if self.database_names()?.iter().any(|db| db == schema) => {
                Ok(schema.to_string())
            }
            Some(schema) => Err(MetadataError::UnknownSchema(schema.to_string())),
        }
    }

    /// `(type, create sql)` of a table or view.
    fn table_definition(&self, db: &str, table: &str) -> MetadataResult<(String, String)> {
        let sql = format!(
            "SELECT type, COALESCE(sql, '') FROM {}.sqlite_master \
             WHERE name = ?1 AND type IN ('table', 'view')",
            quote_identifier(db)
        );
        self.conn
            .query_row(&sql, params![table], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?
            .ok_or_else(|| {
                MetadataError::UnknownTable(qualified_name(None, reported_schema(db), &[table]))
            })
    }

    fn table_names(&self, db: &str) -> MetadataResult<Vec<(String, String)>> {
        let sql = format!(
            "SELECT name, type FROM {}.sqlite_master \
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' ORDER BY name",
            quote_identifier(db)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn table_info(&self, db: &str, table: &str) -> MetadataResult<Vec<TableInfoRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1, ?2) ORDER BY cid",
        )?;
        let rows = stmt
            .query_map(params![table, db], |row| {
                Ok(TableInfoRow {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                    not_null: row.get::<_, i64>(2)? != 0,
                    pk: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

struct TableInfoRow {
    name: String,
    declared_type: String,
    not_null: bool,
    /// 1-based position in the primary key, 0 if not part of it.
    pk: i64,
}

struct ForeignKeyRow {
    id: i64,
    seq: i64,
    parent: String,
    from: String,
    to: Option<String>,
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn reported_schema(db: &str) -> Option<&str> {
    (db != MAIN_DATABASE).then_some(db)
}

/// Split `DECIMAL(10, 2)` into `("DECIMAL", Some(10), Some(2))`.
fn parse_declared_type(declared: &str) -> (String, Option<i32>, Option<i32>) {
    let Some((base, rest)) = declared.split_once('(') else {
        return (declared.trim().to_uppercase(), None, None);
    };
    let mut args = rest
        .trim_end()
        .trim_end_matches(')')
        .split(',')
        .map(|a| a.trim().parse::<i32>().ok());
    let size = args.next().flatten();
    let scale = args.next().flatten();
    (base.trim().to_uppercase(), size, scale)
}

/// Portable type for a declared SQLite type name.
///
/// Well-known names map directly; anything else follows SQLite's column
/// affinity rules.
fn db_type_for(base: &str) -> DbType {
    match base {
        "" => DbType::Other,
        "INT" | "INTEGER" | "MEDIUMINT" => DbType::Integer,
        "BIGINT" | "INT8" | "UNSIGNED BIG INT" => DbType::BigInt,
        "SMALLINT" | "INT2" => DbType::SmallInt,
        "TINYINT" => DbType::TinyInt,
        "BOOLEAN" | "BOOL" => DbType::Boolean,
        "CHAR" | "CHARACTER" => DbType::Char,
        "NCHAR" | "NATIVE CHARACTER" => DbType::NChar,
        "VARCHAR" | "VARYING CHARACTER" | "TEXT" => DbType::Varchar,
        "NVARCHAR" => DbType::NVarchar,
        "CLOB" => DbType::Clob,
        "REAL" => DbType::Real,
        "DOUBLE" | "DOUBLE PRECISION" => DbType::Double,
        "FLOAT" => DbType::Float,
        "NUMERIC" => DbType::Numeric,
        "DECIMAL" => DbType::Decimal,
        "DATE" => DbType::Date,
        "TIME" => DbType::Time,
        "DATETIME" | "TIMESTAMP" => DbType::Timestamp,
        "BLOB" => DbType::Blob,
        "BINARY" => DbType::Binary,
        "VARBINARY" => DbType::VarBinary,
        other if other.contains("INT") => DbType::Integer,
        other if ["CHAR", "CLOB", "TEXT"].iter().any(|t| other.contains(t)) => DbType::Varchar,
        other if other.contains("BLOB") => DbType::Blob,
        other if ["REAL", "FLOA", "DOUB"].iter().any(|t| other.contains(t)) => DbType::Double,
        _ => DbType::Numeric,
    }
}

impl MetadataSource for SqliteMetadataSource {
    fn catalogs(&self) -> MetadataResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn schemas(&self) -> MetadataResult<Vec<String>> {
        self.database_names()
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        types: &[String],
    ) -> MetadataResult<Vec<TableInfo>> {
        let db = self.resolve_database(catalog, schema)?;
        let tables = self
            .table_names(&db)?
            .into_iter()
            .map(|(name, kind)| TableInfo {
                catalog: None,
                schema: reported_schema(&db).map(str::to_string),
                name,
                table_type: kind.to_uppercase(),
            })
            .filter(|t| types.iter().any(|ty| ty.eq_ignore_ascii_case(&t.table_type)))
            .collect::<Vec<_>>();
        debug!(database = %db, count = tables.len(), "Listed SQLite tables");
        Ok(tables)
    }

    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnInfo>> {
        let db = self.resolve_database(catalog, schema)?;
        let (_, create_sql) = self.table_definition(&db, table)?;
        let rows = self.table_info(&db, table)?;

        let pk_count = rows.iter().filter(|r| r.pk > 0).count();
        let autoincrement = create_sql.to_uppercase().contains("AUTOINCREMENT");

        Ok(rows
            .into_iter()
            .map(|row| {
                let (base, size, scale) = parse_declared_type(&row.declared_type);
                // INTEGER PRIMARY KEY aliases the rowid and can never be NULL.
                let rowid_alias = row.pk > 0 && pk_count == 1 && base == "INTEGER";
                ColumnInfo {
                    table: table.to_string(),
                    name: row.name,
                    type_code: db_type_for(&base).code(),
                    type_name: row.declared_type,
                    nullable: !row.not_null && !rowid_alias,
                    size,
                    scale,
                    autoincrement: rowid_alias && autoincrement,
                }
            })
            .collect())
    }

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<PrimaryKeyColumn>> {
        let db = self.resolve_database(catalog, schema)?;
        self.table_definition(&db, table)?;

        let mut keys = self
            .table_info(&db, table)?
            .into_iter()
            .filter(|row| row.pk > 0)
            .map(|row| PrimaryKeyColumn {
                table: table.to_string(),
                column: row.name,
                key_seq: u16::try_from(row.pk).unwrap_or(u16::MAX),
                pk_name: None,
            })
            .collect::<Vec<_>>();
        keys.sort_by_key(|k| k.key_seq);
        Ok(keys)
    }

    /// SQLite only records keys on the referencing side, so every table of
    /// the database is scanned for references to `table`.
    fn exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ExportedKey>> {
        let db = self.resolve_database(catalog, schema)?;
        self.table_definition(&db, table)?;
        let schema_name = reported_schema(&db).map(str::to_string);

        // Implicit references target the parent's primary key.
        let parent_pk: Vec<String> = self
            .primary_keys(catalog, schema, table)?
            .into_iter()
            .map(|k| k.column)
            .collect();

        let mut stmt = self.conn.prepare(
            "SELECT id, seq, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1, ?2) \
             ORDER BY id, seq",
        )?;

        let mut keys = Vec::new();
        for (child, kind) in self.table_names(&db)? {
            if kind != "table" {
                continue;
            }

            let rows = stmt
                .query_map(params![child, db], |row| {
                    Ok(ForeignKeyRow {
                        id: row.get(0)?,
                        seq: row.get(1)?,
                        parent: row.get(2)?,
                        from: row.get(3)?,
                        to: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for row in rows.into_iter().filter(|r| r.parent.eq_ignore_ascii_case(table)) {
                let pk_column = match row.to {
                    Some(to) => to,
                    None => match usize::try_from(row.seq).ok().and_then(|i| parent_pk.get(i)) {
                        Some(column) => column.clone(),
                        None => continue,
                    },
                };

                keys.push(ExportedKey {
                    pk_catalog: None,
                    pk_schema: schema_name.clone(),
                    pk_table: table.to_string(),
                    pk_column,
                    pk_name: None,
                    fk_catalog: None,
                    fk_schema: schema_name.clone(),
                    fk_table: child.clone(),
                    fk_column: row.from,
                    // SQLite keeps no constraint names; the per-table id tells keys apart.
                    fk_name: Some(format!("fk_{}_{}", child, row.id)),
                    key_seq: u16::try_from(row.seq + 1).unwrap_or(u16::MAX),
                });
            }
        }

        Ok(keys)
    }
}
