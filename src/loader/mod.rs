//! Database metadata loading.
//!
//! A [`DbLoader`] runs a fixed sequence of stages against a
//! [`MetadataSource`], filtered by a compiled [`FiltersConfig`]:
//!
//! ```text
//! Entities -> Attributes -> PrimaryKeys -> ExportedKeys -> Relationships -> Procedures -> Done
//! ```
//!
//! Stages accumulate into the [`MetadataStore`] of a caller-owned
//! [`LoadContext`]; the target [`DataMap`] is only touched when the last
//! stage completes.
//!
//! # Example
//!
//! ```rust,ignore
//! use dbsync::config::ReverseEngineering;
//! use dbsync::loader::DbLoader;
//! use dbsync::metadata::SqliteMetadataSource;
//!
//! let source = SqliteMetadataSource::open("art.db")?;
//! let tree = ReverseEngineering::new().exclude_table("SYS_.*");
//! let map = DbLoader::from_config(&source, &tree)?.load(None)?;
//! ```

mod attributes;
mod cancel;
mod context;
mod delegate;
mod entities;
mod exported_keys;
mod primary_keys;
mod procedures;
mod relationships;
mod store;

use std::fmt;
use std::ops::ControlFlow;

use thiserror::Error;
use tracing::{debug, info, warn};

pub use cancel::CancellationFlag;
pub use context::{LoadContext, LoadStatus};
pub use delegate::{DefaultDelegate, Diagnostic, LoaderDelegate};
pub use procedures::RETURN_VALUE_NAME;
pub use store::MetadataStore;

use crate::config::{ReverseEngineering, DEFAULT_MAP_NAME};
use crate::filters::{compile, FilterError, FiltersConfig};
use crate::metadata::{MetadataError, MetadataResult, MetadataSource};
use crate::model::DataMap;
use crate::naming::{DefaultNameGenerator, NameGenerator};

/// Errors that stop a loading run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The filter configuration did not compile
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// A metadata query failed
    #[error("Metadata error during {stage}: {source}")]
    Metadata {
        stage: LoaderStage,
        #[source]
        source: MetadataError,
    },

    /// The cancellation flag was raised
    #[error("Loading cancelled after {} completed stage(s)", completed.len())]
    Cancelled { completed: Vec<LoaderStage> },

    /// The delegate vetoed a diagnostic
    #[error("Loading aborted during {stage}: {reason}")]
    Aborted { stage: LoaderStage, reason: String },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Loading stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoaderStage {
    Entities,
    Attributes,
    PrimaryKeys,
    ExportedKeys,
    Relationships,
    Procedures,
    Done,
}

impl LoaderStage {
    pub const ALL: [LoaderStage; 7] = [
        Self::Entities,
        Self::Attributes,
        Self::PrimaryKeys,
        Self::ExportedKeys,
        Self::Relationships,
        Self::Procedures,
        Self::Done,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Entities => Self::Attributes,
            Self::Attributes => Self::PrimaryKeys,
            Self::PrimaryKeys => Self::ExportedKeys,
            Self::ExportedKeys => Self::Relationships,
            Self::Relationships => Self::Procedures,
            Self::Procedures | Self::Done => Self::Done,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Attributes => "attributes",
            Self::PrimaryKeys => "primary keys",
            Self::ExportedKeys => "exported keys",
            Self::Relationships => "relationships",
            Self::Procedures => "procedures",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for LoaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loading switches outside the filter rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Table types to list; empty means the source's defaults.
    pub table_types: Vec<String>,
    pub skip_relationships: bool,
    pub skip_primary_keys: bool,
    pub skip_procedures: bool,
}

impl LoaderOptions {
    pub fn from_config(tree: &ReverseEngineering) -> Self {
        Self {
            table_types: tree.table_types.clone(),
            skip_relationships: tree.skip_relationships,
            skip_primary_keys: tree.skip_primary_keys,
            skip_procedures: tree.skip_procedures,
        }
    }

    fn skips(&self, stage: LoaderStage) -> bool {
        match stage {
            LoaderStage::PrimaryKeys => self.skip_primary_keys,
            LoaderStage::ExportedKeys | LoaderStage::Relationships => self.skip_relationships,
            LoaderStage::Procedures => self.skip_procedures,
            _ => false,
        }
    }
}

/// Read-only inputs shared by the stages.
pub(crate) struct StageEnv<'a> {
    source: &'a dyn MetadataSource,
    filters: &'a FiltersConfig,
    options: &'a LoaderOptions,
    names: &'a dyn NameGenerator,
}

impl StageEnv<'_> {
    fn table_types(&self) -> Vec<String> {
        if self.options.table_types.is_empty() {
            self.source.default_table_types()
        } else {
            self.options.table_types.clone()
        }
    }
}

type StageFn = fn(&StageEnv<'_>, &mut LoadContext, &mut dyn LoaderDelegate) -> MetadataResult<Vec<Diagnostic>>;

fn stage_fn(stage: LoaderStage) -> Option<StageFn> {
    match stage {
        LoaderStage::Entities => Some(entities::load_entities),
        LoaderStage::Attributes => Some(attributes::load_attributes),
        LoaderStage::PrimaryKeys => Some(primary_keys::load_primary_keys),
        LoaderStage::ExportedKeys => Some(exported_keys::load_exported_keys),
        LoaderStage::Relationships => Some(relationships::load_relationships),
        LoaderStage::Procedures => Some(procedures::load_procedures),
        LoaderStage::Done => None,
    }
}

/// Imports tables, columns, keys, relationships and procedures into a [`DataMap`].
pub struct DbLoader<'a> {
    source: &'a dyn MetadataSource,
    filters: FiltersConfig,
    options: LoaderOptions,
    names: Box<dyn NameGenerator + 'a>,
    delegate: Option<&'a mut dyn LoaderDelegate>,
    cancel: CancellationFlag,
}

impl<'a> DbLoader<'a> {
    pub fn new(source: &'a dyn MetadataSource, filters: FiltersConfig) -> Self {
        Self {
            source,
            filters,
            options: LoaderOptions::default(),
            names: Box::new(DefaultNameGenerator),
            delegate: None,
            cancel: CancellationFlag::new(),
        }
    }

    /// Compile the filter tree and take the loading switches from it.
    pub fn from_config(source: &'a dyn MetadataSource, tree: &ReverseEngineering) -> LoadResult<Self> {
        let filters = compile(tree)?;
        Ok(Self::new(source, filters).with_options(LoaderOptions::from_config(tree)))
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_delegate(mut self, delegate: &'a mut dyn LoaderDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn with_name_generator(mut self, names: impl NameGenerator + 'a) -> Self {
        self.names = Box::new(names);
        self
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// Flag that stops this loader at the next stage boundary.
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    pub fn filters(&self) -> &FiltersConfig {
        &self.filters
    }

    /// Run the remaining stages of `ctx`.
    ///
    /// On success the loaded entities and procedures are merged into the
    /// context's map. On error the map is untouched and the context status
    /// names the stage that did not finish.
    pub fn run(&mut self, ctx: &mut LoadContext) -> LoadResult<()> {
        let env = StageEnv {
            source: self.source,
            filters: &self.filters,
            options: &self.options,
            names: self.names.as_ref(),
        };
        let mut fallback = DefaultDelegate;
        let delegate: &mut dyn LoaderDelegate = match self.delegate.as_deref_mut() {
            Some(delegate) => delegate,
            None => &mut fallback,
        };

        ctx.status = LoadStatus::InProgress;
        while let Some(run_stage) = stage_fn(ctx.stage) {
            let stage = ctx.stage;
            if self.cancel.is_cancelled() {
                info!(%stage, "Loading cancelled");
                ctx.status = LoadStatus::Incomplete { stage };
                return Err(LoadError::Cancelled {
                    completed: ctx.completed.clone(),
                });
            }

            if env.options.skips(stage) {
                debug!(%stage, "Stage skipped by configuration");
            } else {
                debug!(%stage, "Stage started");
                let diagnostics = run_stage(&env, ctx, delegate).map_err(|source| {
                    ctx.status = LoadStatus::Incomplete { stage };
                    LoadError::Metadata { stage, source }
                })?;

                for diagnostic in diagnostics {
                    let verdict = delegate.on_diagnostic(&diagnostic);
                    ctx.diagnostics.push(diagnostic);
                    if let ControlFlow::Break(reason) = verdict {
                        warn!(%stage, %reason, "Loading aborted by delegate");
                        ctx.status = LoadStatus::Incomplete { stage };
                        return Err(LoadError::Aborted { stage, reason });
                    }
                }
            }

            ctx.completed.push(stage);
            ctx.stage = stage.next();
        }

        ctx.merge_into_map();
        ctx.status = LoadStatus::Complete;
        info!(
            entities = ctx.map().entities().count(),
            procedures = ctx.map().procedures().count(),
            diagnostics = ctx.diagnostics.len(),
            "Loading complete"
        );
        Ok(())
    }

    /// Load into `existing`, or into a new map named `dbsync_import`.
    pub fn load(&mut self, existing: Option<DataMap>) -> LoadResult<DataMap> {
        let map = existing.unwrap_or_else(|| DataMap::new(DEFAULT_MAP_NAME));
        let mut ctx = LoadContext::new(map);
        self.run(&mut ctx)?;
        Ok(ctx.into_data_map())
    }
}
