//! The schema model produced by reverse engineering.
//!
//! A [`DataMap`] holds [`DbEntity`] tables (with their [`DbAttribute`]
//! columns and [`DbRelationship`]s) and stored [`Procedure`]s. Every type is
//! serde-serializable so a map can be written out and merged into later.

mod data_map;
mod entity;
mod procedure;
mod relationship;
mod types;

pub use data_map::DataMap;
pub use entity::{DbAttribute, DbEntity};
pub use procedure::{ParameterDirection, Procedure, ProcedureParameter};
pub use relationship::{DbJoin, DbRelationship};
pub use types::DbType;
