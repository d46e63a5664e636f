//! Relationship naming.

use inflector::Inflector;

use super::{pluralize, singularize};
use crate::model::{DbEntity, DbRelationship};

/// FK column suffixes stripped when naming a to-one relationship after its column.
const KEY_SUFFIXES: &[&str] = &["_id", "_fk", "_key"];

/// Picks the base name of a new relationship.
///
/// The loader makes the result unique within the owning entity, see
/// [`unique_name`].
pub trait NameGenerator {
    fn relationship_name(&self, source: &DbEntity, relationship: &DbRelationship, target: &DbEntity) -> String;
}

/// Names relationships after the target table or the FK column.
///
/// - to-many: plural of the target (`paintings`)
/// - FK side over a single `*_ID` column: the column minus its suffix (`artist`)
/// - other to-one: singular of the target (`artistDetail`)
///
/// Names come out camelCased (`ARTIST_EXHIBIT` becomes `artistExhibits`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNameGenerator;

impl NameGenerator for DefaultNameGenerator {
    fn relationship_name(&self, _source: &DbEntity, relationship: &DbRelationship, target: &DbEntity) -> String {
        if relationship.to_many {
            return pluralize(&target.name).to_camel_case();
        }
        if !relationship.to_dependent_pk {
            if let [join] = relationship.joins.as_slice() {
                if let Some(stem) = strip_key_suffix(&join.source) {
                    return stem.to_camel_case();
                }
            }
        }
        singularize(&target.name).to_camel_case()
    }
}

/// `ARTIST_ID` -> `artist`; `None` when no key suffix or nothing is left.
fn strip_key_suffix(column: &str) -> Option<String> {
    let lower = column.to_lowercase();
    KEY_SUFFIXES.iter().find_map(|suffix| {
        lower
            .strip_suffix(suffix)
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    })
}

/// `base`, or `base1`, `base2`, ... for the first name not yet taken on `entity`.
pub fn unique_name(entity: &DbEntity, base: &str) -> String {
    if !entity.has_property(base) {
        return base.to_string();
    }
    (1u32..)
        .map(|n| format!("{}{}", base, n))
        .find(|candidate| !entity.has_property(candidate))
        .unwrap_or_else(|| base.to_string())
}
