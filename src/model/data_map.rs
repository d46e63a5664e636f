//! The named container handed to the mapping layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DbEntity, Procedure};

/// Entities and procedures keyed by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct DataMap {
    pub name: String,
    #[serde(default)]
    entities: BTreeMap<String, DbEntity>,
    #[serde(default)]
    procedures: BTreeMap<String, Procedure>,
}

impl DataMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn entity(&self, qualified_name: &str) -> Option<&DbEntity> {
        self.entities.get(qualified_name)
    }

    pub fn contains_entity(&self, qualified_name: &str) -> bool {
        self.entities.contains_key(qualified_name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &DbEntity> {
        self.entities.values()
    }

    /// Add or replace an entity.
    pub fn add_entity(&mut self, entity: DbEntity) {
        self.entities.insert(entity.qualified_name(), entity);
    }

    pub fn remove_entity(&mut self, qualified_name: &str) -> Option<DbEntity> {
        self.entities.remove(qualified_name)
    }

    pub fn procedure(&self, qualified_name: &str) -> Option<&Procedure> {
        self.procedures.get(qualified_name)
    }

    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        self.procedures.values()
    }

    pub fn add_procedure(&mut self, procedure: Procedure) {
        self.procedures.insert(procedure.qualified_name(), procedure);
    }
}

/// One line per entity: name, attribute count, relationships.
impl fmt::Display for DataMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DataMap: {}", self.name)?;
        for entity in self.entities.values() {
            write!(
                f,
                "  {} ({} attributes)",
                entity.qualified_name(),
                entity.attributes.len()
            )?;
            for rel in &entity.relationships {
                let arrow = if rel.to_many { "->>" } else { "->" };
                write!(f, " {} {} {}", rel.name, arrow, rel.target_entity)?;
            }
            writeln!(f)?;
        }
        for procedure in self.procedures.values() {
            writeln!(
                f,
                "  procedure {} ({} parameters)",
                procedure.qualified_name(),
                procedure.parameters.len()
            )?;
        }
        Ok(())
    }
}
