//! Primary key marking.

use tracing::warn;

use super::delegate::{Diagnostic, LoaderDelegate};
use super::{LoadContext, StageEnv};
use crate::metadata::MetadataResult;

pub(super) fn load_primary_keys(
    env: &StageEnv<'_>,
    ctx: &mut LoadContext,
    _delegate: &mut dyn LoaderDelegate,
) -> MetadataResult<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    for name in ctx.store.entity_names() {
        let Some(entity) = ctx.store.entity_mut(&name) else {
            continue;
        };
        let mut keys = env.source.primary_keys(
            entity.catalog.as_deref(),
            entity.schema.as_deref(),
            &entity.name,
        )?;
        keys.sort_by_key(|k| k.key_seq);

        for key in keys {
            if key.table != entity.name {
                continue;
            }
            match entity.attribute_mut(&key.column) {
                Some(attribute) => attribute.primary_key = true,
                None => {
                    warn!(entity = %name, column = %key.column, "Primary key column not loaded");
                    diagnostics.push(Diagnostic::PrimaryKeyColumnMissing {
                        entity: name.clone(),
                        column: key.column,
                    });
                    continue;
                }
            }
            if key.pk_name.is_some() {
                entity.pk_name = key.pk_name;
            }
        }
    }

    Ok(diagnostics)
}
