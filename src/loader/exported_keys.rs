//! Foreign key discovery.

use tracing::{debug, info, warn};

use super::delegate::{Diagnostic, LoaderDelegate};
use super::{LoadContext, StageEnv};
use crate::metadata::MetadataResult;

/// Collect keys referencing each loaded or kept entity.
///
/// Keys from tables that were neither loaded nor kept, or that the rules of
/// their own scope exclude, are dropped, as are keys between two kept
/// entities. Views whose exported keys cannot be read are reported and
/// skipped; the same failure on a table is fatal.
pub(super) fn load_exported_keys(
    env: &StageEnv<'_>,
    ctx: &mut LoadContext,
    delegate: &mut dyn LoaderDelegate,
) -> MetadataResult<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    let mut names = ctx.store.entity_names();
    names.extend(ctx.store.kept_entities().map(str::to_string));

    for name in names {
        let Some(entity) = ctx.entity(&name) else {
            continue;
        };
        if !delegate.accept_relationships_for(entity) {
            debug!(entity = %name, "Relationships declined");
            continue;
        }

        let keys = match env.source.exported_keys(
            entity.catalog.as_deref(),
            entity.schema.as_deref(),
            &entity.name,
        ) {
            Ok(keys) => keys,
            Err(e) if entity.is_view() => {
                warn!(entity = %name, error = %e, "Exported keys unavailable for view");
                diagnostics.push(Diagnostic::ExportedKeysUnavailable {
                    entity: name.clone(),
                    message: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };
        let pk_kept = ctx.store.is_kept(&name);

        for key in keys {
            let fk_table = key.fk_qualified_table();
            if !ctx.store.knows_entity(&fk_table) {
                info!(key = %key, "Skipping key from table that was not loaded");
                diagnostics.push(Diagnostic::ExportedKeySkipped {
                    key: key.to_string(),
                    reason: format!("table '{}' not loaded", fk_table),
                });
                continue;
            }
            if pk_kept && ctx.store.is_kept(&fk_table) {
                debug!(key = %key, "Both ends kept, nothing to relate");
                continue;
            }
            let included = env
                .filters
                .table_filter(key.fk_catalog.as_deref(), key.fk_schema.as_deref())
                .map_or(true, |f| f.is_include_table(&key.fk_table));
            if !included {
                info!(key = %key, "Skipping key from excluded table");
                continue;
            }
            ctx.store.add_exported_key(key);
        }
    }

    Ok(diagnostics)
}
