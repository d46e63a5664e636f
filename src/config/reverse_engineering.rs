//! The declarative reverse-engineering tree, as authored by users.
//!
//! Rules may be declared at four levels at once (global, catalog, schema,
//! table) and may overlap. This is the uncompiled form: see
//! [`crate::filters::compile`] for turning it into a [`FiltersConfig`].
//!
//! ```toml
//! [reverse_engineering]
//! exclude_tables = ["SYS_.*"]
//! include_columns = ["[A-Z_]+"]
//!
//! [[reverse_engineering.catalogs]]
//! name = "APP"
//!
//! [[reverse_engineering.catalogs.schemas]]
//! name = "PUBLIC"
//! include_tables = [{ pattern = "ARTIST", exclude_columns = ["SECRET_.*"] }]
//! ```
//!
//! [`FiltersConfig`]: crate::filters::FiltersConfig

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filters::format::{display_name, TreeWriter};

/// A table include rule with its own column rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IncludeTable {
    /// Table name pattern; absent means every table.
    pub pattern: Option<String>,
    pub include_columns: Vec<String>,
    pub exclude_columns: Vec<String>,
    /// Overrides the tree-wide case sensitivity for this entry.
    pub case_sensitive: Option<bool>,
}

impl IncludeTable {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// An entry matching every table.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn include_column(mut self, pattern: impl Into<String>) -> Self {
        self.include_columns.push(pattern.into());
        self
    }

    pub fn exclude_column(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_columns.push(pattern.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    fn render(&self, w: &mut TreeWriter) {
        w.entry("IncludeTable", display_name(self.pattern.as_deref()));
        w.nested(|w| {
            w.entries("IncludeColumn", strs(&self.include_columns));
            w.entries("ExcludeColumn", strs(&self.exclude_columns));
        });
    }
}

/// Rules that can be declared at the global, catalog and schema levels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterContainer {
    pub include_tables: Vec<IncludeTable>,
    pub exclude_tables: Vec<String>,
    pub include_columns: Vec<String>,
    pub exclude_columns: Vec<String>,
    pub include_procedures: Vec<String>,
    pub exclude_procedures: Vec<String>,
}

impl FilterContainer {
    /// True when no rule of any kind is declared.
    pub fn is_empty(&self) -> bool {
        self.include_tables.is_empty()
            && self.exclude_tables.is_empty()
            && self.include_columns.is_empty()
            && self.exclude_columns.is_empty()
            && self.include_procedures.is_empty()
            && self.exclude_procedures.is_empty()
    }

    fn render(&self, w: &mut TreeWriter) {
        self.include_tables.iter().for_each(|table| table.render(w));
        w.entries("ExcludeTable", strs(&self.exclude_tables));
        w.entries("IncludeColumn", strs(&self.include_columns));
        w.entries("ExcludeColumn", strs(&self.exclude_columns));
        w.entries("IncludeProcedure", strs(&self.include_procedures));
        w.entries("ExcludeProcedure", strs(&self.exclude_procedures));
    }
}

fn strs(patterns: &[String]) -> impl Iterator<Item = &str> {
    patterns.iter().map(String::as_str)
}

/// Builder methods shared by every level that holds a [`FilterContainer`].
macro_rules! filter_builders {
    ($ty:ty) => {
        impl $ty {
            pub fn include_table(mut self, table: IncludeTable) -> Self {
                self.filters.include_tables.push(table);
                self
            }

            pub fn exclude_table(mut self, pattern: impl Into<String>) -> Self {
                self.filters.exclude_tables.push(pattern.into());
                self
            }

            pub fn include_column(mut self, pattern: impl Into<String>) -> Self {
                self.filters.include_columns.push(pattern.into());
                self
            }

            pub fn exclude_column(mut self, pattern: impl Into<String>) -> Self {
                self.filters.exclude_columns.push(pattern.into());
                self
            }

            pub fn include_procedure(mut self, pattern: impl Into<String>) -> Self {
                self.filters.include_procedures.push(pattern.into());
                self
            }

            pub fn exclude_procedure(mut self, pattern: impl Into<String>) -> Self {
                self.filters.exclude_procedures.push(pattern.into());
                self
            }
        }
    };
}

/// Schema-level rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Schema {
    pub name: Option<String>,
    #[serde(flatten)]
    pub filters: FilterContainer,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            filters: FilterContainer::default(),
        }
    }

    /// The "no schema" scope.
    pub fn unnamed() -> Self {
        Self::default()
    }

    fn render(&self, w: &mut TreeWriter) {
        w.entry("Schema", display_name(self.name.as_deref()));
        w.nested(|w| self.filters.render(w));
    }
}

filter_builders!(Schema);

/// Catalog-level rules and the schemas declared under the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Catalog {
    pub name: Option<String>,
    pub schemas: Vec<Schema>,
    #[serde(flatten)]
    pub filters: FilterContainer,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The "no catalog" scope.
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    fn render(&self, w: &mut TreeWriter) {
        w.entry("Catalog", display_name(self.name.as_deref()));
        w.nested(|w| {
            self.schemas.iter().for_each(|schema| schema.render(w));
            self.filters.render(w);
        });
    }
}

filter_builders!(Catalog);

fn default_case_sensitive() -> bool {
    true
}

/// Root of the declarative tree: global rules, catalogs, catalog-less
/// schemas and the loader flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReverseEngineering {
    pub catalogs: Vec<Catalog>,
    pub schemas: Vec<Schema>,
    #[serde(flatten)]
    pub filters: FilterContainer,

    /// Table types to enumerate (e.g. `TABLE`, `VIEW`); empty means the
    /// metadata source's defaults.
    pub table_types: Vec<String>,
    pub skip_relationships: bool,
    pub skip_primary_keys: bool,
    pub skip_procedures: bool,

    /// Case-folding hint: default case sensitivity of every pattern.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

impl Default for ReverseEngineering {
    fn default() -> Self {
        Self {
            catalogs: Vec::new(),
            schemas: Vec::new(),
            filters: FilterContainer::default(),
            table_types: Vec::new(),
            skip_relationships: false,
            skip_primary_keys: false,
            skip_procedures: false,
            case_sensitive: true,
        }
    }
}

impl ReverseEngineering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalogs.push(catalog);
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn table_type(mut self, table_type: impl Into<String>) -> Self {
        self.table_types.push(table_type.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn skip_relationships(mut self, skip: bool) -> Self {
        self.skip_relationships = skip;
        self
    }

    pub fn skip_primary_keys(mut self, skip: bool) -> Self {
        self.skip_primary_keys = skip;
        self
    }

    pub fn skip_procedures(mut self, skip: bool) -> Self {
        self.skip_procedures = skip;
        self
    }
}

filter_builders!(ReverseEngineering);

impl fmt::Display for ReverseEngineering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = TreeWriter::new();
        w.line("ReverseEngineering: ");
        w.nested(|w| {
            self.catalogs.iter().for_each(|catalog| catalog.render(w));
            self.schemas.iter().for_each(|schema| schema.render(w));
            self.filters.render(w);
        });
        f.write_str(&w.finish())
    }
}
