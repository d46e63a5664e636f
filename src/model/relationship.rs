//! Directional relationships between entities.

use serde::{Deserialize, Serialize};

/// One column pair of a relationship, source column to target column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DbJoin {
    pub source: String,
    pub target: String,
}

impl DbJoin {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A relationship from the owning entity to `target_entity`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DbRelationship {
    pub name: String,
    /// Qualified name of the target entity.
    pub target_entity: String,
    pub to_many: bool,
    /// Every join targets a primary key column of the target.
    #[serde(default)]
    pub to_dependent_pk: bool,
    /// FK constraint name; set on the FK side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk_name: Option<String>,
    pub joins: Vec<DbJoin>,
}

impl DbRelationship {
    pub fn new(target_entity: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            target_entity: target_entity.into(),
            to_many: false,
            to_dependent_pk: false,
            fk_name: None,
            joins: Vec::new(),
        }
    }

    pub fn add_join(&mut self, join: DbJoin) {
        self.joins.push(join);
    }

    /// Source column names in join order.
    pub fn source_columns(&self) -> impl Iterator<Item = &str> {
        self.joins.iter().map(|j| j.source.as_str())
    }
}
