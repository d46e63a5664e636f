//! Relationship synthesis from collected exported keys.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::delegate::{Diagnostic, LoaderDelegate};
use super::{LoadContext, StageEnv};
use crate::metadata::{ExportedKey, MetadataResult};
use crate::model::{DbEntity, DbJoin, DbRelationship};
use crate::naming::unique_name;

/// (PK table, FK table, FK constraint name).
type KeyGroup = (String, String, Option<String>);

/// Build a relationship pair per foreign key.
///
/// The FK entity gets a to-one relationship to the PK entity. The PK entity
/// gets the reverse, to-one when the FK columns are exactly the dependent
/// entity's primary key, to-many otherwise.
///
/// Either end may be an entity kept in the target map; only the end loaded
/// in this run receives its relationship.
pub(super) fn load_relationships(
    env: &StageEnv<'_>,
    ctx: &mut LoadContext,
    delegate: &mut dyn LoaderDelegate,
) -> MetadataResult<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    let mut groups: BTreeMap<KeyGroup, Vec<ExportedKey>> = BTreeMap::new();
    for key in ctx.store.exported_keys() {
        groups
            .entry((key.pk_qualified_table(), key.fk_qualified_table(), key.fk_name.clone()))
            .or_default()
            .push(key.clone());
    }

    for ((pk_table, fk_table, fk_name), mut keys) in groups {
        keys.sort_by_key(|k| k.key_seq);
        let Some(first) = keys.first() else {
            continue;
        };
        let (Some(pk_entity), Some(fk_entity)) = (ctx.entity(&pk_table), ctx.entity(&fk_table)) else {
            continue;
        };

        if !in_scope(pk_entity, first.pk_catalog.as_deref(), first.pk_schema.as_deref())
            || !in_scope(fk_entity, first.fk_catalog.as_deref(), first.fk_schema.as_deref())
        {
            info!(key = %first, "Skipping key across catalogs or schemas");
            diagnostics.push(Diagnostic::ExportedKeySkipped {
                key: first.to_string(),
                reason: "entity in another catalog or schema".to_string(),
            });
            continue;
        }

        if pk_entity.primary_keys().next().is_none() {
            warn!(entity = %pk_table, "Referenced entity has no primary key");
            diagnostics.push(Diagnostic::MissingPrimaryKey {
                entity: pk_table.clone(),
            });
        }

        let mut forward = DbRelationship::new(&fk_table);
        let mut reverse = DbRelationship::new(&pk_table);
        for key in &keys {
            let missing = if pk_entity.attribute(&key.pk_column).is_none() {
                Some((&pk_table, &key.pk_column))
            } else if fk_entity.attribute(&key.fk_column).is_none() {
                Some((&fk_table, &key.fk_column))
            } else {
                None
            };
            if let Some((entity, column)) = missing {
                info!(key = %key, column = %column, "Skipping invalid join");
                diagnostics.push(Diagnostic::InvalidJoin {
                    entity: entity.clone(),
                    column: column.clone(),
                });
                continue;
            }
            forward.add_join(DbJoin::new(&key.pk_column, &key.fk_column));
            reverse.add_join(DbJoin::new(&key.fk_column, &key.pk_column));
        }
        if forward.joins.is_empty() {
            debug!(pk = %pk_table, fk = %fk_table, "No valid joins, no relationship");
            continue;
        }

        let to_dependent_pk = forward
            .joins
            .iter()
            .all(|j| fk_entity.attribute(&j.target).is_some_and(|a| a.primary_key));
        let one_to_one = to_dependent_pk && fk_entity.primary_keys().count() == forward.joins.len();
        forward.to_dependent_pk = to_dependent_pk;
        forward.to_many = !one_to_one;
        reverse.fk_name = fk_name;

        let reverse_base = env.names.relationship_name(fk_entity, &reverse, pk_entity);
        let forward_base = env.names.relationship_name(pk_entity, &forward, fk_entity);

        if let Some(entity) = ctx.store.entity_mut(&fk_table) {
            reverse.name = unique_name(entity, &reverse_base);
            if delegate.accept_relationship(entity, &reverse) {
                entity.add_relationship(reverse);
            }
        }
        if let Some(entity) = ctx.store.entity_mut(&pk_table) {
            forward.name = unique_name(entity, &forward_base);
            if delegate.accept_relationship(entity, &forward) {
                entity.add_relationship(forward);
            }
        }
    }

    Ok(diagnostics)
}

fn in_scope(entity: &DbEntity, catalog: Option<&str>, schema: Option<&str>) -> bool {
    entity.catalog.as_deref() == catalog && entity.schema.as_deref() == schema
}
