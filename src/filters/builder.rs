//! Compaction of the declarative tree and compilation into [`FiltersConfig`].
//!
//! Compaction pushes every rule declared at a broad level (global, catalog)
//! down into the schemas it applies to, so each schema ends up carrying its
//! complete rule set. Order is significant and fixed: a schema's own entries
//! come first, then the global ones, then its catalog's. Column rules are
//! appended to include-table entries before those entries are copied, so a
//! table inherited from a broad level only carries the column rules of the
//! levels at and above its declaration.
//!
//! A catalog, or a schema within one catalog, declared more than once ends up
//! as a single scope holding the rules of every declaration, first
//! declaration first.

use std::mem;

use tracing::debug;

use crate::config::{Catalog, FilterContainer, IncludeTable, ReverseEngineering, Schema};

use super::pattern::{Pattern, PatternFilter};
use super::scope::{CatalogFilter, FiltersConfig, SchemaFilter};
use super::table::{IncludeTableFilter, TableFilter};
use super::FilterResult;

/// Compiles a [`ReverseEngineering`] tree into a [`FiltersConfig`].
#[derive(Debug, Clone)]
pub struct FiltersConfigBuilder {
    tree: ReverseEngineering,
}

impl FiltersConfigBuilder {
    pub fn new(tree: &ReverseEngineering) -> Self {
        Self { tree: tree.clone() }
    }

    /// The compacted tree: every rule lives in a schema under a catalog.
    pub fn compact(&self) -> ReverseEngineering {
        compact(&self.tree)
    }

    /// Compact the tree and compile every (catalog, schema) scope.
    ///
    /// Fails on the first invalid pattern, before any metadata is read.
    pub fn build(&self) -> FilterResult<FiltersConfig> {
        let compacted = self.compact();
        let case_sensitive = compacted.case_sensitive;

        let catalogs = compacted
            .catalogs
            .iter()
            .map(|catalog| compile_catalog(catalog, case_sensitive))
            .collect::<FilterResult<Vec<_>>>()?;

        let config = FiltersConfig::new(catalogs);
        debug!(scopes = config.scopes().count(), "Compiled filters");
        Ok(config)
    }
}

/// Compile a tree; see [`FiltersConfigBuilder::build`].
pub fn compile(tree: &ReverseEngineering) -> FilterResult<FiltersConfig> {
    FiltersConfigBuilder::new(tree).build()
}

/// Push every inherited rule down into the schemas it applies to.
///
/// Returns a new tree with no global rules, no catalog-level rules and no
/// catalog-less schemas. Compacting a compacted tree returns it unchanged.
pub fn compact(tree: &ReverseEngineering) -> ReverseEngineering {
    let mut tree = tree.clone();
    tree.catalogs = merge_catalogs(mem::take(&mut tree.catalogs));
    add_empty_elements(&mut tree);
    compact_columns(&mut tree);
    compact_tables(&mut tree);
    compact_procedures(&mut tree);
    move_schemas_to_catalogs(&mut tree);
    tree
}

/// Make the implicit scopes explicit.
///
/// A tree with no catalog gets the "no catalog" one; a catalog with nothing
/// under it gets the "no schema" one; a schema that would otherwise admit no
/// table gets an include-everything table entry.
fn add_empty_elements(tree: &mut ReverseEngineering) {
    if tree.catalogs.is_empty() {
        tree.catalogs.push(Catalog::unnamed());
    }

    let root_has_schemas = !tree.schemas.is_empty();
    let root_has_tables = !tree.filters.include_tables.is_empty();

    for catalog in &mut tree.catalogs {
        // Root schemas land in every catalog later, but a catalog with its own
        // rules still needs a scope to hold them.
        if catalog.schemas.is_empty() && (!root_has_schemas || !catalog.filters.is_empty()) {
            catalog.schemas.push(Schema::unnamed());
        }

        let inherits_tables = root_has_tables || !catalog.filters.include_tables.is_empty();
        for schema in &mut catalog.schemas {
            if schema.filters.include_tables.is_empty() && !inherits_tables {
                schema.filters.include_tables.push(IncludeTable::all());
            }
        }
    }

    for schema in &mut tree.schemas {
        if schema.filters.include_tables.is_empty() && !root_has_tables {
            schema.filters.include_tables.push(IncludeTable::all());
        }
    }
}

fn append_columns(tables: &mut [IncludeTable], includes: &[String], excludes: &[String]) {
    for table in tables {
        table.include_columns.extend_from_slice(includes);
        table.exclude_columns.extend_from_slice(excludes);
    }
}

fn take_columns(filters: &mut FilterContainer) -> (Vec<String>, Vec<String>) {
    (
        mem::take(&mut filters.include_columns),
        mem::take(&mut filters.exclude_columns),
    )
}

/// Append level-wide column rules to the include-table entries they cover,
/// broadest level first.
fn compact_columns(tree: &mut ReverseEngineering) {
    let (includes, excludes) = take_columns(&mut tree.filters);

    append_columns(&mut tree.filters.include_tables, &includes, &excludes);
    for catalog in &mut tree.catalogs {
        append_columns(&mut catalog.filters.include_tables, &includes, &excludes);
        for schema in &mut catalog.schemas {
            append_columns(&mut schema.filters.include_tables, &includes, &excludes);
        }
    }
    for schema in &mut tree.schemas {
        append_columns(&mut schema.filters.include_tables, &includes, &excludes);
    }

    for catalog in &mut tree.catalogs {
        let (includes, excludes) = take_columns(&mut catalog.filters);
        append_columns(&mut catalog.filters.include_tables, &includes, &excludes);
        for schema in &mut catalog.schemas {
            append_columns(&mut schema.filters.include_tables, &includes, &excludes);
        }
    }

    let schemas = tree
        .catalogs
        .iter_mut()
        .flat_map(|c| c.schemas.iter_mut())
        .chain(tree.schemas.iter_mut());
    for schema in schemas {
        let (includes, excludes) = take_columns(&mut schema.filters);
        append_columns(&mut schema.filters.include_tables, &includes, &excludes);
    }
}

/// Copy global then catalog table rules after each schema's own.
fn compact_tables(tree: &mut ReverseEngineering) {
    let global_tables = mem::take(&mut tree.filters.include_tables);
    let global_excludes = mem::take(&mut tree.filters.exclude_tables);

    for catalog in &mut tree.catalogs {
        let catalog_tables = mem::take(&mut catalog.filters.include_tables);
        let catalog_excludes = mem::take(&mut catalog.filters.exclude_tables);

        for schema in &mut catalog.schemas {
            let filters = &mut schema.filters;
            filters.include_tables.extend_from_slice(&global_tables);
            filters.include_tables.extend_from_slice(&catalog_tables);
            filters.exclude_tables.extend_from_slice(&global_excludes);
            filters.exclude_tables.extend_from_slice(&catalog_excludes);
        }
    }

    for schema in &mut tree.schemas {
        schema.filters.include_tables.extend_from_slice(&global_tables);
        schema.filters.exclude_tables.extend_from_slice(&global_excludes);
    }
}

/// Same order as tables: own, global, catalog.
fn compact_procedures(tree: &mut ReverseEngineering) {
    let global_includes = mem::take(&mut tree.filters.include_procedures);
    let global_excludes = mem::take(&mut tree.filters.exclude_procedures);

    for catalog in &mut tree.catalogs {
        let catalog_includes = mem::take(&mut catalog.filters.include_procedures);
        let catalog_excludes = mem::take(&mut catalog.filters.exclude_procedures);

        for schema in &mut catalog.schemas {
            let filters = &mut schema.filters;
            filters.include_procedures.extend_from_slice(&global_includes);
            filters.include_procedures.extend_from_slice(&catalog_includes);
            filters.exclude_procedures.extend_from_slice(&global_excludes);
            filters.exclude_procedures.extend_from_slice(&catalog_excludes);
        }
    }

    for schema in &mut tree.schemas {
        schema.filters.include_procedures.extend_from_slice(&global_includes);
        schema.filters.exclude_procedures.extend_from_slice(&global_excludes);
    }
}

/// Catalog-less schemas apply under every catalog.
fn move_schemas_to_catalogs(tree: &mut ReverseEngineering) {
    let schemas = mem::take(&mut tree.schemas);
    for catalog in &mut tree.catalogs {
        catalog.schemas.extend_from_slice(&schemas);
        catalog.schemas = merge_schemas(mem::take(&mut catalog.schemas));
    }
}

fn merge_catalogs(catalogs: Vec<Catalog>) -> Vec<Catalog> {
    let mut merged: Vec<Catalog> = Vec::with_capacity(catalogs.len());
    for catalog in catalogs {
        match merged.iter_mut().find(|c| c.name == catalog.name) {
            Some(first) => {
                first.schemas.extend(catalog.schemas);
                merge_filters(&mut first.filters, catalog.filters);
            }
            None => merged.push(catalog),
        }
    }
    merged
}

fn merge_schemas(schemas: Vec<Schema>) -> Vec<Schema> {
    let mut merged: Vec<Schema> = Vec::with_capacity(schemas.len());
    for schema in schemas {
        match merged.iter_mut().find(|s| s.name == schema.name) {
            Some(first) => merge_filters(&mut first.filters, schema.filters),
            None => merged.push(schema),
        }
    }
    merged
}

/// Append `from` after `into`, dropping entries `into` already has.
fn merge_filters(into: &mut FilterContainer, from: FilterContainer) {
    extend_unique(&mut into.include_tables, from.include_tables);
    extend_unique(&mut into.exclude_tables, from.exclude_tables);
    extend_unique(&mut into.include_columns, from.include_columns);
    extend_unique(&mut into.exclude_columns, from.exclude_columns);
    extend_unique(&mut into.include_procedures, from.include_procedures);
    extend_unique(&mut into.exclude_procedures, from.exclude_procedures);
}

fn extend_unique<T: PartialEq>(into: &mut Vec<T>, from: Vec<T>) {
    for item in from {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

fn compile_catalog(catalog: &Catalog, case_sensitive: bool) -> FilterResult<CatalogFilter> {
    let schemas = catalog
        .schemas
        .iter()
        .map(|schema| compile_schema(schema, case_sensitive))
        .collect::<FilterResult<Vec<_>>>()?;
    Ok(CatalogFilter::new(catalog.name.as_deref(), schemas))
}

fn compile_schema(schema: &Schema, case_sensitive: bool) -> FilterResult<SchemaFilter> {
    let filters = &schema.filters;

    let includes = filters
        .include_tables
        .iter()
        .map(|table| compile_include_table(table, case_sensitive))
        .collect::<FilterResult<Vec<_>>>()?;
    let excludes = filters
        .exclude_tables
        .iter()
        .map(|p| Pattern::new(p, case_sensitive))
        .collect::<FilterResult<Vec<_>>>()?;

    // Procedures are only loaded when some level asks for them.
    let procedures = PatternFilter::from_patterns(
        &filters.include_procedures,
        &filters.exclude_procedures,
        case_sensitive,
        PatternFilter::IncludeNothing,
    )?;

    Ok(SchemaFilter::new(
        schema.name.as_deref(),
        TableFilter::new(includes, excludes),
        procedures,
    ))
}

fn compile_include_table(
    table: &IncludeTable,
    default_case_sensitive: bool,
) -> FilterResult<IncludeTableFilter> {
    let case_sensitive = table.case_sensitive.unwrap_or(default_case_sensitive);
    let columns = PatternFilter::from_patterns(
        &table.include_columns,
        &table.exclude_columns,
        case_sensitive,
        PatternFilter::IncludeEverything,
    )?;
    IncludeTableFilter::with_columns(table.pattern.as_deref(), columns, case_sensitive)
}
