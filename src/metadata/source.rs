//! MetadataSource trait definition.
//!
//! The trait abstracts over the read-only query surface of a live database
//! (or a recorded snapshot of one). Calls are synchronous: a loading run holds
//! the source exclusively and issues one query at a time.

use super::types::*;
use super::{ExportedKey, MetadataResult};

/// Table types enumerated when the configuration names none.
pub const DEFAULT_TABLE_TYPES: &[&str] = &["TABLE", "VIEW"];

/// Read-only access to database metadata.
///
/// A `None` catalog or schema addresses the "no catalog" / default schema
/// scope. Implementations must fail with an error, not return an empty list,
/// when asked about a catalog or schema the database does not have.
pub trait MetadataSource {
    /// All catalog names; empty for databases without catalogs.
    fn catalogs(&self) -> MetadataResult<Vec<String>>;

    /// All schema names; empty for databases without schemas.
    fn schemas(&self) -> MetadataResult<Vec<String>>;

    /// Table types this source knows how to enumerate.
    fn default_table_types(&self) -> Vec<String> {
        DEFAULT_TABLE_TYPES.iter().map(|t| t.to_string()).collect()
    }

    /// Tables of the given types in one scope.
    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        types: &[String],
    ) -> MetadataResult<Vec<TableInfo>>;

    /// Columns of one table, in declaration order.
    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnInfo>>;

    /// Primary key columns of one table.
    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<PrimaryKeyColumn>>;

    /// Foreign key columns in any table that reference `table`'s key.
    fn exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ExportedKey>>;

    /// Stored procedures in one scope.
    fn procedures(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
    ) -> MetadataResult<Vec<ProcedureInfo>> {
        Ok(Vec::new())
    }

    /// Parameters and result columns of every procedure in one scope.
    fn procedure_columns(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
    ) -> MetadataResult<Vec<ProcedureColumnInfo>> {
        Ok(Vec::new())
    }
}
