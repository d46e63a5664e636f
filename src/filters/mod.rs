//! Include/exclude filters for reverse engineering.
//!
//! A declarative [`ReverseEngineering`](crate::config::ReverseEngineering)
//! tree is compiled once into a [`FiltersConfig`]: one self-contained table
//! and procedure filter per (catalog, schema). Loader stages only ever read
//! the compiled form.
//!
//! # Example
//!
//! ```rust,ignore
//! use dbsync::config::{ReverseEngineering, Schema};
//! use dbsync::filters::compile;
//!
//! let tree = ReverseEngineering::new()
//!     .schema(Schema::new("PUBLIC"))
//!     .exclude_table("SYS_.*");
//! let filters = compile(&tree)?;
//! assert!(!filters.table_filter(None, Some("PUBLIC")).unwrap().is_include_table("SYS_X"));
//! ```

mod builder;
pub mod format;
mod pattern;
mod scope;
mod table;

use thiserror::Error;

pub use builder::{compact, compile, FiltersConfigBuilder};
pub use pattern::{Pattern, PatternFilter, PatternRules};
pub use scope::{CatalogFilter, FiltersConfig, SchemaFilter};
pub use table::{IncludeTableFilter, TableFilter};

/// Errors raised while compiling filter rules.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A declared pattern is not a valid regular expression
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for filter compilation.
pub type FilterResult<T> = Result<T, FilterError>;
