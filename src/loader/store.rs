//! Accumulator shared by the loader stages of one run.

use std::collections::{BTreeMap, BTreeSet};

use crate::filters::PatternFilter;
use crate::metadata::ExportedKey;
use crate::model::{DbEntity, Procedure};

/// Entities, candidate foreign keys and procedures discovered so far.
///
/// Entities are keyed by qualified name, case as reported by the database.
/// Exported keys are grouped under their qualified PK column; a PK column
/// referenced from several tables collects one key per reference.
///
/// Entities of the target map that the run found but left in place are
/// remembered as kept, so keys between them and loaded entities still count.
#[derive(Debug, Default)]
pub struct MetadataStore {
    entities: BTreeMap<String, DbEntity>,
    kept: BTreeSet<String>,
    column_filters: BTreeMap<String, PatternFilter>,
    exported_keys: BTreeMap<String, BTreeSet<ExportedKey>>,
    procedures: BTreeMap<String, Procedure>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entity, with the column filter its columns pass.
    pub fn add_entity(&mut self, entity: DbEntity, columns: PatternFilter) {
        let name = entity.qualified_name();
        self.column_filters.insert(name.clone(), columns);
        self.entities.insert(name, entity);
    }

    pub fn entity(&self, qualified_name: &str) -> Option<&DbEntity> {
        self.entities.get(qualified_name)
    }

    pub(crate) fn entity_mut(&mut self, qualified_name: &str) -> Option<&mut DbEntity> {
        self.entities.get_mut(qualified_name)
    }

    pub fn contains_entity(&self, qualified_name: &str) -> bool {
        self.entities.contains_key(qualified_name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &DbEntity> {
        self.entities.values()
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    /// Remember a map entity that this run found but did not replace.
    pub fn add_kept(&mut self, qualified_name: impl Into<String>) {
        self.kept.insert(qualified_name.into());
    }

    pub fn is_kept(&self, qualified_name: &str) -> bool {
        self.kept.contains(qualified_name)
    }

    pub fn kept_entities(&self) -> impl Iterator<Item = &str> {
        self.kept.iter().map(String::as_str)
    }

    /// Loaded in this run, or kept from the target map.
    pub fn knows_entity(&self, qualified_name: &str) -> bool {
        self.contains_entity(qualified_name) || self.is_kept(qualified_name)
    }

    pub fn column_filter(&self, qualified_name: &str) -> Option<&PatternFilter> {
        self.column_filters.get(qualified_name)
    }

    /// Record an exported key; false if an equal key was already recorded.
    pub fn add_exported_key(&mut self, key: ExportedKey) -> bool {
        self.exported_keys
            .entry(key.pk_qualified_column())
            .or_default()
            .insert(key)
    }

    pub fn exported_keys_for(&self, pk_qualified_column: &str) -> Option<&BTreeSet<ExportedKey>> {
        self.exported_keys.get(pk_qualified_column)
    }

    pub fn exported_keys(&self) -> impl Iterator<Item = &ExportedKey> {
        self.exported_keys.values().flatten()
    }

    pub fn add_procedure(&mut self, procedure: Procedure) {
        self.procedures.insert(procedure.qualified_name(), procedure);
    }

    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        self.procedures.values()
    }

    pub(crate) fn take_entities(&mut self) -> Vec<DbEntity> {
        self.column_filters.clear();
        self.kept.clear();
        std::mem::take(&mut self.entities).into_values().collect()
    }

    pub(crate) fn take_procedures(&mut self) -> Vec<Procedure> {
        std::mem::take(&mut self.procedures).into_values().collect()
    }
}
