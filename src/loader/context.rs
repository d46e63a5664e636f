//! Per-run loader state owned by the caller.

use super::delegate::Diagnostic;
use super::store::MetadataStore;
use super::LoaderStage;
use crate::model::{DataMap, DbEntity};

/// How far a run got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    InProgress,
    Complete,
    /// Stopped by cancellation, an abort or an error before `stage` finished.
    Incomplete { stage: LoaderStage },
}

/// Target map, accumulated metadata and diagnostics of one loading run.
///
/// Nothing reaches the map before the run completes; an interrupted run
/// leaves it as it was handed in.
#[derive(Debug)]
pub struct LoadContext {
    map: DataMap,
    pub(super) store: MetadataStore,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) status: LoadStatus,
    pub(super) stage: LoaderStage,
    pub(super) completed: Vec<LoaderStage>,
}

impl LoadContext {
    pub fn new(map: DataMap) -> Self {
        Self {
            map,
            store: MetadataStore::new(),
            diagnostics: Vec::new(),
            status: LoadStatus::InProgress,
            stage: LoaderStage::Entities,
            completed: Vec::new(),
        }
    }

    pub fn map(&self) -> &DataMap {
        &self.map
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Next stage to run.
    pub fn stage(&self) -> LoaderStage {
        self.stage
    }

    /// Stages that ran to completion, in order.
    pub fn completed_stages(&self) -> &[LoaderStage] {
        &self.completed
    }

    /// An entity loaded in this run, or one the run kept in the target map.
    pub fn entity(&self, qualified_name: &str) -> Option<&DbEntity> {
        match self.store.entity(qualified_name) {
            Some(entity) => Some(entity),
            None if self.store.is_kept(qualified_name) => self.map.entity(qualified_name),
            None => None,
        }
    }

    pub fn into_data_map(self) -> DataMap {
        self.map
    }

    /// Move loaded entities and procedures into the map, replacing same-named ones.
    pub(super) fn merge_into_map(&mut self) {
        for entity in self.store.take_entities() {
            self.map.add_entity(entity);
        }
        for procedure in self.store.take_procedures() {
            self.map.add_procedure(procedure);
        }
    }
}
