//! Column loading.

use tracing::{debug, warn};

use super::delegate::{Diagnostic, LoaderDelegate};
use super::{LoadContext, StageEnv};
use crate::filters::PatternFilter;
use crate::metadata::MetadataResult;
use crate::model::{DbAttribute, DbType};

pub(super) fn load_attributes(
    env: &StageEnv<'_>,
    ctx: &mut LoadContext,
    _delegate: &mut dyn LoaderDelegate,
) -> MetadataResult<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    for name in ctx.store.entity_names() {
        let filter = ctx
            .store
            .column_filter(&name)
            .cloned()
            .unwrap_or(PatternFilter::IncludeEverything);
        let Some(entity) = ctx.store.entity_mut(&name) else {
            continue;
        };
        let columns = env.source.columns(
            entity.catalog.as_deref(),
            entity.schema.as_deref(),
            &entity.name,
        )?;

        for column in columns {
            // Sources may match table names by pattern.
            if column.table != entity.name {
                continue;
            }
            if !filter.is_included(&column.name) {
                debug!(entity = %name, column = %column.name, "Column excluded by filters");
                continue;
            }
            let Some(db_type) = DbType::from_code(column.type_code) else {
                warn!(
                    entity = %name,
                    column = %column.name,
                    type_code = column.type_code,
                    type_name = %column.type_name,
                    "Unknown column type, skipping column"
                );
                diagnostics.push(Diagnostic::ColumnTypeUnknown {
                    entity: name.clone(),
                    column: column.name,
                    type_code: column.type_code,
                });
                continue;
            };

            let mut attribute = DbAttribute::new(column.name, db_type);
            attribute.max_length = column.size;
            attribute.scale = column.scale.filter(|_| db_type.is_decimal());
            attribute.mandatory = !column.nullable;
            attribute.generated = column.autoincrement;
            entity.add_attribute(attribute);
        }
    }

    Ok(diagnostics)
}
