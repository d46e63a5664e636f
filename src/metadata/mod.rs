//! Metadata source module.
//!
//! This module abstracts the read-only metadata surface of a database
//! (catalogs, schemas, tables, columns, keys, procedures).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MetadataSource                             │
//! │  - catalogs() / schemas()                                       │
//! │  - tables(catalog, schema, types)                               │
//! │  - columns() / primary_keys() / exported_keys()                 │
//! │  - procedures() / procedure_columns()                           │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                                    │
//!            ▼                                    ▼
//! ┌────────────────────────────┐   ┌────────────────────────────────┐
//! │   SqliteMetadataSource     │   │     MemoryMetadataSource       │
//! │   (live rusqlite database) │   │     (JSON snapshot)            │
//! └────────────────────────────┘   └────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dbsync::metadata::{MetadataSource, SqliteMetadataSource};
//!
//! let source = SqliteMetadataSource::open("art.db")?;
//! let tables = source.tables(None, None, &source.default_table_types())?;
//! ```

mod exported_key;
mod memory;
mod source;
mod sqlite;
mod types;

use thiserror::Error;

pub use exported_key::{qualified_name, ExportedKey};
pub use memory::{MemoryMetadataSource, ProcedureSnapshot, TableSnapshot};
pub use source::{MetadataSource, DEFAULT_TABLE_TYPES};
pub use sqlite::SqliteMetadataSource;
pub use types::*;

/// Errors reported by a metadata source.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Unknown catalog: {0}")]
    UnknownCatalog(String),

    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// The source cannot answer this query for this object.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Invalid metadata snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;
