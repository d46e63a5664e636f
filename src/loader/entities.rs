//! Table discovery.

use tracing::{debug, info};

use super::delegate::{Diagnostic, LoaderDelegate};
use super::{LoadContext, StageEnv};
use crate::metadata::MetadataResult;
use crate::model::DbEntity;

/// List tables of every filtered scope and keep those the table rules include.
///
/// Tables are checked against the rules of the scope the database reports
/// them in; when that scope was never declared, the rules of the scope that
/// was queried apply.
pub(super) fn load_entities(
    env: &StageEnv<'_>,
    ctx: &mut LoadContext,
    delegate: &mut dyn LoaderDelegate,
) -> MetadataResult<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    let types = env.table_types();

    for (catalog, schema) in env.filters.scopes() {
        let tables = env
            .source
            .tables(catalog.name.as_deref(), schema.name.as_deref(), &types)?;
        debug!(
            catalog = ?catalog.name,
            schema = ?schema.name,
            count = tables.len(),
            "Listed tables"
        );

        for table in tables {
            let filter = env
                .filters
                .table_filter(table.catalog.as_deref(), table.schema.as_deref())
                .unwrap_or(&schema.tables);
            let Some(columns) = filter.include_table_column_filter(&table.name) else {
                debug!(table = %table.name, "Table excluded by filters");
                continue;
            };

            let entity = DbEntity::new(
                &table.name,
                table.catalog.as_deref(),
                table.schema.as_deref(),
                &table.table_type,
            );
            let name = entity.qualified_name();
            if ctx.store.knows_entity(&name) {
                continue;
            }
            if let Some(existing) = ctx.map().entity(&name) {
                if !delegate.overwrite_entity(existing) {
                    info!(entity = %name, "Keeping existing entity");
                    ctx.store.add_kept(&name);
                    diagnostics.push(Diagnostic::EntitySkipped { entity: name });
                    continue;
                }
            }

            delegate.entity_added(&entity);
            ctx.store.add_entity(entity, columns.clone());
        }
    }

    info!(count = ctx.store.entities().count(), "Entities loaded");
    Ok(diagnostics)
}
