//! Configuration module for dbsync.
//!
//! Handles the declarative reverse-engineering tree, the settings file and
//! environment variables.

mod reverse_engineering;
mod settings;

pub use reverse_engineering::{Catalog, FilterContainer, IncludeTable, ReverseEngineering, Schema};
pub use settings::{
    expand_env_vars, MapSettings, Settings, SettingsError, SourceLocation, SourceSettings,
    DEFAULT_MAP_NAME,
};
