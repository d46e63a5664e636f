//! TOML-based configuration for dbsync.
//!
//! Supports a config file (dbsync.toml) with environment variable expansion
//! in source paths.
//!
//! Example configuration:
//! ```toml
//! [source]
//! sqlite = "${DATA_DIR}/art.db"
//!
//! [map]
//! name = "art"
//!
//! [reverse_engineering]
//! table_types = ["TABLE", "VIEW"]
//! skip_procedures = true
//! exclude_tables = ["SYS_.*"]
//!
//! [[reverse_engineering.schemas]]
//! name = "main"
//! include_tables = [{ pattern = "ARTIST|PAINTING" }]
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ReverseEngineering;

/// Errors raised while reading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Name given to a freshly created map when none is configured.
pub const DEFAULT_MAP_NAME: &str = "dbsync_import";

/// Contents of `dbsync.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where metadata is read from.
    pub source: SourceSettings,

    /// Output map settings.
    pub map: MapSettings,

    /// Filter rules and loader flags.
    pub reverse_engineering: ReverseEngineering,
}

/// Metadata source. Exactly one of the fields must be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Path to a SQLite database file (supports ${ENV_VAR} expansion).
    pub sqlite: Option<String>,

    /// Path to a JSON metadata snapshot (supports ${ENV_VAR} expansion).
    pub snapshot: Option<String>,
}

/// A resolved metadata source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Sqlite(PathBuf),
    Snapshot(PathBuf),
}

impl SourceSettings {
    /// Resolve the configured source, expanding environment variables.
    pub fn location(&self) -> Result<SourceLocation, SettingsError> {
        match (&self.sqlite, &self.snapshot) {
            (Some(path), None) => Ok(SourceLocation::Sqlite(expand_env_vars(path)?.into())),
            (None, Some(path)) => Ok(SourceLocation::Snapshot(expand_env_vars(path)?.into())),
            (Some(_), Some(_)) => Err(SettingsError::InvalidConfig(
                "[source] sets both 'sqlite' and 'snapshot'".to_string(),
            )),
            (None, None) => Err(SettingsError::InvalidConfig(
                "[source] needs one of 'sqlite' or 'snapshot'".to_string(),
            )),
        }
    }
}

/// Output map configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapSettings {
    /// Name of a map created from scratch.
    pub name: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_MAP_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Parse a TOML settings file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SettingsError::FileNotFound(path.to_path_buf()),
            _ => SettingsError::ReadError(e),
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// The first settings file found, or defaults when there is none.
    ///
    /// `DBSYNC_CONFIG` wins and must exist; otherwise `./dbsync.toml`, then
    /// `<config dir>/dbsync/config.toml`.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("DBSYNC_CONFIG") {
            return Self::from_file(path);
        }

        let candidates = std::iter::once(PathBuf::from("dbsync.toml"))
            .chain(dirs::config_dir().map(|dir| dir.join("dbsync").join("config.toml")));
        for path in candidates {
            if path.is_file() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }
}

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}|\$([A-Za-z0-9_]+)").unwrap());

/// Substitute `${VAR}` and `$VAR` references. A `$` not followed by a name
/// is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut expanded = String::with_capacity(s.len());
    let mut last = 0;

    for caps in ENV_VAR.captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2))) else {
            continue;
        };
        let value = env::var(name.as_str())
            .map_err(|_| SettingsError::MissingEnvVar(name.as_str().to_string()))?;
        expanded.push_str(&s[last..whole.start()]);
        expanded.push_str(&value);
        last = whole.end();
    }

    expanded.push_str(&s[last..]);
    Ok(expanded)
}
