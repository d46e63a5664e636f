//! One foreign-key column to primary-key column correspondence.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Join `catalog.schema.table.column` into a dotted name.
///
/// An absent schema under a present catalog leaves an empty segment
/// (`C..T`), so it never reads like a catalog-less schema (`S.T`). Other
/// absent parts are skipped.
pub fn qualified_name(catalog: Option<&str>, schema: Option<&str>, parts: &[&str]) -> String {
    let schema = match (catalog, schema) {
        (Some(_), None) => Some(""),
        _ => schema,
    };
    catalog
        .into_iter()
        .chain(schema)
        .chain(parts.iter().copied())
        .collect::<Vec<_>>()
        .join(".")
}

/// (catalog, schema, table, column, constraint name) of one side of a key.
type KeySide<'a> = (Option<&'a str>, Option<&'a str>, &'a str, &'a str, Option<&'a str>);

/// A single FK column referencing a single PK column.
///
/// Equality, ordering and hashing cover the catalog, schema, table, column
/// and constraint name of both sides, so the same key observed twice
/// collapses to one entry in a set. `key_seq` is carried along but is not
/// part of the identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportedKey {
    #[serde(default)]
    pub pk_catalog: Option<String>,
    #[serde(default)]
    pub pk_schema: Option<String>,
    pub pk_table: String,
    pub pk_column: String,
    #[serde(default)]
    pub pk_name: Option<String>,

    #[serde(default)]
    pub fk_catalog: Option<String>,
    #[serde(default)]
    pub fk_schema: Option<String>,
    pub fk_table: String,
    pub fk_column: String,
    #[serde(default)]
    pub fk_name: Option<String>,

    /// Position within a composite key (1-based).
    pub key_seq: u16,
}

impl ExportedKey {
    fn identity(&self) -> (KeySide<'_>, KeySide<'_>) {
        (
            (
                self.pk_catalog.as_deref(),
                self.pk_schema.as_deref(),
                self.pk_table.as_str(),
                self.pk_column.as_str(),
                self.pk_name.as_deref(),
            ),
            (
                self.fk_catalog.as_deref(),
                self.fk_schema.as_deref(),
                self.fk_table.as_str(),
                self.fk_column.as_str(),
                self.fk_name.as_deref(),
            ),
        )
    }

    /// Qualified PK column; exported keys are grouped under it.
    pub fn pk_qualified_column(&self) -> String {
        qualified_name(
            self.pk_catalog.as_deref(),
            self.pk_schema.as_deref(),
            &[&self.pk_table, &self.pk_column],
        )
    }

    pub fn fk_qualified_column(&self) -> String {
        qualified_name(
            self.fk_catalog.as_deref(),
            self.fk_schema.as_deref(),
            &[&self.fk_table, &self.fk_column],
        )
    }

    pub fn pk_qualified_table(&self) -> String {
        qualified_name(
            self.pk_catalog.as_deref(),
            self.pk_schema.as_deref(),
            &[&self.pk_table],
        )
    }

    pub fn fk_qualified_table(&self) -> String {
        qualified_name(
            self.fk_catalog.as_deref(),
            self.fk_schema.as_deref(),
            &[&self.fk_table],
        )
    }
}

impl PartialEq for ExportedKey {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ExportedKey {}

impl Hash for ExportedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for ExportedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExportedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for ExportedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <- {}",
            self.pk_qualified_column(),
            self.fk_qualified_column()
        )?;
        if let Some(name) = &self.fk_name {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}
