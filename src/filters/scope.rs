//! Compiled per-scope filters and lookups by (catalog, schema).

use std::fmt;

use super::format::{display_name, TreeWriter};
use super::pattern::PatternFilter;
use super::table::TableFilter;

/// Table and procedure filters for one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFilter {
    pub name: Option<String>,
    pub tables: TableFilter,
    pub procedures: PatternFilter,
}

impl SchemaFilter {
    pub fn new(name: Option<&str>, tables: TableFilter, procedures: PatternFilter) -> Self {
        Self {
            name: name.map(str::to_string),
            tables,
            procedures,
        }
    }
}

/// Schema filters grouped under one catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub name: Option<String>,
    pub schemas: Vec<SchemaFilter>,
}

impl CatalogFilter {
    pub fn new(name: Option<&str>, schemas: Vec<SchemaFilter>) -> Self {
        Self {
            name: name.map(str::to_string),
            schemas,
        }
    }

    /// A catalog carrying its filters directly, with no named schema.
    ///
    /// The rules are held by the catalog's no-schema scope, so they are
    /// found by `(catalog, None)` lookups.
    pub fn direct(name: Option<&str>, tables: TableFilter, procedures: PatternFilter) -> Self {
        Self::new(name, vec![SchemaFilter::new(None, tables, procedures)])
    }

    pub fn schema(&self, name: Option<&str>) -> Option<&SchemaFilter> {
        self.schemas.iter().find(|s| s.name.as_deref() == name)
    }
}

/// The compiled filter set: one self-contained filter per (catalog, schema).
///
/// A `None` catalog or schema is a key of its own ("no catalog"), never a
/// wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FiltersConfig {
    catalogs: Vec<CatalogFilter>,
}

impl FiltersConfig {
    pub fn new(catalogs: Vec<CatalogFilter>) -> Self {
        Self { catalogs }
    }

    /// A filter set with a single (catalog, schema) scope.
    pub fn create(
        catalog: Option<&str>,
        schema: Option<&str>,
        tables: TableFilter,
        procedures: PatternFilter,
    ) -> Self {
        Self::new(vec![CatalogFilter::new(
            catalog,
            vec![SchemaFilter::new(schema, tables, procedures)],
        )])
    }

    /// Every table and column of the default scope; no procedures.
    pub fn everything() -> Self {
        Self::create(
            None,
            None,
            TableFilter::everything(),
            PatternFilter::IncludeNothing,
        )
    }

    pub fn catalogs(&self) -> &[CatalogFilter] {
        &self.catalogs
    }

    pub fn catalog(&self, name: Option<&str>) -> Option<&CatalogFilter> {
        self.catalogs.iter().find(|c| c.name.as_deref() == name)
    }

    pub fn schema_filter(&self, catalog: Option<&str>, schema: Option<&str>) -> Option<&SchemaFilter> {
        self.catalog(catalog)?.schema(schema)
    }

    /// Table rules recorded for the scope, `None` if the scope was never declared.
    pub fn table_filter(&self, catalog: Option<&str>, schema: Option<&str>) -> Option<&TableFilter> {
        self.schema_filter(catalog, schema).map(|s| &s.tables)
    }

    /// Procedure rules recorded for the scope, `None` if the scope was never declared.
    pub fn procedures_filter(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> Option<&PatternFilter> {
        self.schema_filter(catalog, schema).map(|s| &s.procedures)
    }

    /// Every declared (catalog, schema) scope in declaration order.
    pub fn scopes(&self) -> impl Iterator<Item = (&CatalogFilter, &SchemaFilter)> {
        self.catalogs
            .iter()
            .flat_map(|c| c.schemas.iter().map(move |s| (c, s)))
    }
}

impl fmt::Display for FiltersConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = TreeWriter::new();
        w.line("FiltersConfig:");
        w.nested(|w| {
            for catalog in &self.catalogs {
                w.entry("Catalog", display_name(catalog.name.as_deref()));
                w.nested(|w| {
                    for schema in &catalog.schemas {
                        w.entry("Schema", display_name(schema.name.as_deref()));
                        w.nested(|w| {
                            schema.tables.render(w);
                            schema.procedures.render(w, "IncludeProcedure", "ExcludeProcedure");
                        });
                    }
                });
            }
        });
        f.write_str(&w.finish())
    }
}
