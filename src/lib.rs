//! # dbsync
//!
//! Reverse-engineers relational database metadata into a logical schema model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        ReverseEngineering (declarative filter tree)      │
//! │   catalogs / schemas / include & exclude patterns        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [filters: compact + compile]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    FiltersConfig                         │
//! │      (catalog, schema) -> table / column / procedure     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [loader stages]      ◄── MetadataSource
//! ┌─────────────────────────────────────────────────────────┐
//! │                    MetadataStore                         │
//! │   entities, attributes, keys, relationships, procedures  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [merge]
//! ┌─────────────────────────────────────────────────────────┐
//! │                       DataMap                            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod filters;
pub mod loader;
pub mod metadata;
pub mod model;
pub mod naming;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{Catalog, IncludeTable, ReverseEngineering, Schema, Settings};
    pub use crate::filters::{compile, FiltersConfig, PatternFilter, TableFilter};
    pub use crate::loader::{DbLoader, Diagnostic, LoadContext, LoadError, LoaderDelegate};
    pub use crate::metadata::{MemoryMetadataSource, MetadataSource, SqliteMetadataSource};
    pub use crate::model::{DataMap, DbAttribute, DbEntity, DbRelationship, DbType};
}
