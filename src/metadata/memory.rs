//! Metadata served from a recorded snapshot.
//!
//! Snapshots are JSON documents, handy for databases that are not reachable
//! from where the import runs and for scenarios SQLite cannot express
//! (catalogs, several schemas, stored procedures).
//!
//! ```json
//! {
//!   "catalogs": ["APP"],
//!   "schemas": ["PUBLIC"],
//!   "tables": [{
//!     "catalog": "APP", "schema": "PUBLIC", "name": "ARTIST",
//!     "columns": [{ "name": "ARTIST_ID", "type_code": 4, "nullable": false }],
//!     "primary_key": ["ARTIST_ID"]
//!   }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::source::MetadataSource;
use super::types::*;
use super::{qualified_name, ExportedKey, MetadataError, MetadataResult};

fn default_table_type() -> String {
    "TABLE".to_string()
}

/// One recorded table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableSnapshot {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(rename = "type", default = "default_table_type")]
    pub table_type: String,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    /// Primary key column names in key order.
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub pk_name: Option<String>,
    /// Keys in other tables referencing this table.
    #[serde(default)]
    pub exported_keys: Vec<ExportedKey>,
    /// The recorded driver refused to report exported keys for this table.
    #[serde(default)]
    pub exported_keys_unsupported: bool,
}

impl TableSnapshot {
    pub fn new(catalog: Option<&str>, schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            catalog: catalog.map(str::to_string),
            schema: schema.map(str::to_string),
            name: name.into(),
            table_type: default_table_type(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            pk_name: None,
            exported_keys: Vec::new(),
            exported_keys_unsupported: false,
        }
    }

    pub fn table_type(mut self, table_type: impl Into<String>) -> Self {
        self.table_type = table_type.into();
        self
    }

    pub fn column(mut self, column: ColumnInfo) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn exported_key(mut self, key: ExportedKey) -> Self {
        self.exported_keys.push(key);
        self
    }

    pub fn exported_keys_unsupported(mut self) -> Self {
        self.exported_keys_unsupported = true;
        self
    }

    fn in_scope(&self, catalog: Option<&str>, schema: Option<&str>) -> bool {
        self.catalog.as_deref() == catalog && self.schema.as_deref() == schema
    }
}

/// One recorded stored procedure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcedureSnapshot {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default)]
    pub kind: ProcedureKind,
    #[serde(default)]
    pub columns: Vec<ProcedureColumnInfo>,
}

/// A [`MetadataSource`] over recorded tables and procedures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryMetadataSource {
    pub catalogs: Vec<String>,
    pub schemas: Vec<String>,
    pub tables: Vec<TableSnapshot>,
    pub procedures: Vec<ProcedureSnapshot>,
}

impl MemoryMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> MetadataResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MetadataResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_catalog(mut self, name: impl Into<String>) -> Self {
        self.catalogs.push(name.into());
        self
    }

    pub fn with_schema(mut self, name: impl Into<String>) -> Self {
        self.schemas.push(name.into());
        self
    }

    pub fn with_table(mut self, table: TableSnapshot) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_procedure(mut self, procedure: ProcedureSnapshot) -> Self {
        self.procedures.push(procedure);
        self
    }

    fn check_scope(&self, catalog: Option<&str>, schema: Option<&str>) -> MetadataResult<()> {
        if let Some(catalog) = catalog {
            if !self.catalogs.iter().any(|c| c == catalog) {
                return Err(MetadataError::UnknownCatalog(catalog.to_string()));
            }
        }
        if let Some(schema) = schema {
            if !self.schemas.iter().any(|s| s == schema) {
                return Err(MetadataError::UnknownSchema(schema.to_string()));
            }
        }
        Ok(())
    }

    fn table(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        name: &str,
    ) -> MetadataResult<&TableSnapshot> {
        self.check_scope(catalog, schema)?;
        self.tables
            .iter()
            .find(|t| t.in_scope(catalog, schema) && t.name == name)
            .ok_or_else(|| MetadataError::UnknownTable(qualified_name(catalog, schema, &[name])))
    }
}

impl MetadataSource for MemoryMetadataSource {
    fn catalogs(&self) -> MetadataResult<Vec<String>> {
        Ok(self.catalogs.clone())
    }

    fn schemas(&self) -> MetadataResult<Vec<String>> {
        Ok(self.schemas.clone())
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        types: &[String],
    ) -> MetadataResult<Vec<TableInfo>> {
        self.check_scope(catalog, schema)?;
        Ok(self
            .tables
            .iter()
            .filter(|t| t.in_scope(catalog, schema))
            .filter(|t| types.iter().any(|ty| ty.eq_ignore_ascii_case(&t.table_type)))
            .map(|t| TableInfo {
                catalog: t.catalog.clone(),
                schema: t.schema.clone(),
                name: t.name.clone(),
                table_type: t.table_type.clone(),
            })
            .collect())
    }

    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnInfo>> {
        let snapshot = self.table(catalog, schema, table)?;
        Ok(snapshot
            .columns
            .iter()
            .map(|c| ColumnInfo {
                table: snapshot.name.clone(),
                ..c.clone()
            })
            .collect())
    }

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<PrimaryKeyColumn>> {
        let snapshot = self.table(catalog, schema, table)?;
        Ok(snapshot
            .primary_key
            .iter()
            .zip(1u16..)
            .map(|(column, key_seq)| PrimaryKeyColumn {
                table: snapshot.name.clone(),
                column: column.clone(),
                key_seq,
                pk_name: snapshot.pk_name.clone(),
            })
            .collect())
    }

    fn exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ExportedKey>> {
        let snapshot = self.table(catalog, schema, table)?;
        if snapshot.exported_keys_unsupported {
            return Err(MetadataError::Unsupported(format!(
                "exported keys of {}",
                qualified_name(catalog, schema, &[table])
            )));
        }
        Ok(snapshot.exported_keys.clone())
    }

    fn procedures(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<ProcedureInfo>> {
        self.check_scope(catalog, schema)?;
        Ok(self
            .procedures
            .iter()
            .filter(|p| p.catalog.as_deref() == catalog && p.schema.as_deref() == schema)
            .map(|p| ProcedureInfo {
                catalog: p.catalog.clone(),
                schema: p.schema.clone(),
                name: p.name.clone(),
                kind: p.kind,
            })
            .collect())
    }

    fn procedure_columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<ProcedureColumnInfo>> {
        self.check_scope(catalog, schema)?;
        Ok(self
            .procedures
            .iter()
            .filter(|p| p.catalog.as_deref() == catalog && p.schema.as_deref() == schema)
            .flat_map(|p| {
                p.columns.iter().map(move |c| ProcedureColumnInfo {
                    catalog: p.catalog.clone(),
                    schema: p.schema.clone(),
                    procedure: p.name.clone(),
                    ..c.clone()
                })
            })
            .collect())
    }
}
