//! Tables and their columns.

use serde::{Deserialize, Serialize};

use super::{DbRelationship, DbType};
use crate::metadata::qualified_name;

/// A column of a [`DbEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DbAttribute {
    pub name: String,
    pub db_type: DbType,
    /// Declared length or precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    /// Decimal digits; only recorded for decimal types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub primary_key: bool,
    /// Value generated by the database (auto-increment).
    #[serde(default)]
    pub generated: bool,
}

impl DbAttribute {
    pub fn new(name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            name: name.into(),
            db_type,
            max_length: None,
            scale: None,
            mandatory: false,
            primary_key: false,
            generated: false,
        }
    }
}

/// A table or view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DbEntity {
    /// Table name as reported by the database.
    pub name: String,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    /// "TABLE", "VIEW", ...
    #[serde(default)]
    pub table_type: String,
    /// Primary key constraint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk_name: Option<String>,
    #[serde(default)]
    pub attributes: Vec<DbAttribute>,
    #[serde(default)]
    pub relationships: Vec<DbRelationship>,
}

impl DbEntity {
    pub fn new(
        name: impl Into<String>,
        catalog: Option<&str>,
        schema: Option<&str>,
        table_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            catalog: catalog.map(str::to_string),
            schema: schema.map(str::to_string),
            table_type: table_type.into(),
            pk_name: None,
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// `catalog.schema.name`, skipping absent parts.
    pub fn qualified_name(&self) -> String {
        qualified_name(self.catalog.as_deref(), self.schema.as_deref(), &[&self.name])
    }

    pub fn is_view(&self) -> bool {
        self.table_type.eq_ignore_ascii_case("VIEW")
    }

    pub fn attribute(&self, name: &str) -> Option<&DbAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut DbAttribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }

    /// Add an attribute, replacing one with the same name.
    pub fn add_attribute(&mut self, attribute: DbAttribute) {
        match self.attribute_mut(&attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &DbAttribute> {
        self.attributes.iter().filter(|a| a.primary_key)
    }

    pub fn relationship(&self, name: &str) -> Option<&DbRelationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn add_relationship(&mut self, relationship: DbRelationship) {
        self.relationships.push(relationship);
    }

    /// Whether `name` is taken by an attribute or a relationship.
    pub fn has_property(&self, name: &str) -> bool {
        self.attribute(name).is_some() || self.relationship(name).is_some()
    }
}
