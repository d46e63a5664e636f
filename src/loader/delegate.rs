//! Non-fatal loader notifications and the hooks callers can plug in.

use std::fmt;
use std::ops::ControlFlow;

use serde::Serialize;

use crate::model::{DbEntity, DbRelationship};

/// A condition the loader recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An entity already in the target map was kept as is.
    EntitySkipped { entity: String },
    /// A column whose type code has no portable equivalent was left out.
    ColumnTypeUnknown {
        entity: String,
        column: String,
        type_code: i32,
    },
    /// The primary key names a column that was not loaded.
    PrimaryKeyColumnMissing { entity: String, column: String },
    /// The source refused to report exported keys for a view.
    ExportedKeysUnavailable { entity: String, message: String },
    /// An exported key that cannot become a relationship.
    ExportedKeySkipped { key: String, reason: String },
    /// A relationship targets an entity with no primary key.
    MissingPrimaryKey { entity: String },
    /// An exported key names a column that was not loaded.
    InvalidJoin { entity: String, column: String },
    /// A procedure column was left out.
    ProcedureParameterSkipped { procedure: String, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntitySkipped { entity } => write!(f, "{}: already mapped, kept", entity),
            Self::ColumnTypeUnknown {
                entity,
                column,
                type_code,
            } => write!(f, "{}.{}: unknown type code {}", entity, column, type_code),
            Self::PrimaryKeyColumnMissing { entity, column } => {
                write!(f, "{}: primary key column '{}' not loaded", entity, column)
            }
            Self::ExportedKeysUnavailable { entity, message } => {
                write!(f, "{}: exported keys unavailable ({})", entity, message)
            }
            Self::ExportedKeySkipped { key, reason } => write!(f, "{}: skipped, {}", key, reason),
            Self::MissingPrimaryKey { entity } => {
                write!(f, "{}: referenced but has no primary key", entity)
            }
            Self::InvalidJoin { entity, column } => {
                write!(f, "{}: join column '{}' not loaded", entity, column)
            }
            Self::ProcedureParameterSkipped { procedure, reason } => {
                write!(f, "{}: parameter skipped, {}", procedure, reason)
            }
        }
    }
}

/// Hooks into a loading run.
///
/// Every method has a permissive default, so implementors override only
/// what they need.
pub trait LoaderDelegate {
    /// An entity was discovered and added to the store.
    fn entity_added(&mut self, _entity: &DbEntity) {}

    /// Whether to reload an entity the target map already has.
    fn overwrite_entity(&mut self, _existing: &DbEntity) -> bool {
        false
    }

    /// Whether to read exported keys of `entity`.
    fn accept_relationships_for(&mut self, _entity: &DbEntity) -> bool {
        true
    }

    /// Whether to add `relationship` to `entity`.
    fn accept_relationship(&mut self, _entity: &DbEntity, _relationship: &DbRelationship) -> bool {
        true
    }

    /// Called with each diagnostic after its stage; `Break` aborts the run.
    fn on_diagnostic(&mut self, _diagnostic: &Diagnostic) -> ControlFlow<String> {
        ControlFlow::Continue(())
    }
}

/// Accepts everything and never aborts.
#[derive(Debug, Default)]
pub struct DefaultDelegate;

impl LoaderDelegate for DefaultDelegate {}
