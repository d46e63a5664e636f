//! Per-table inclusion with per-table column filters.

use super::format::{display_name, TreeWriter};
use super::pattern::{Pattern, PatternFilter};
use super::FilterResult;

/// One include-table entry: a table-name pattern and the column filter that
/// applies to tables it admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeTableFilter {
    /// `None` matches every table name.
    pattern: Option<Pattern>,
    columns: PatternFilter,
    case_sensitive: bool,
}

impl IncludeTableFilter {
    /// An entry for `pattern` (or every table) admitting every column.
    pub fn new(pattern: Option<&str>, case_sensitive: bool) -> FilterResult<Self> {
        Self::with_columns(pattern, PatternFilter::IncludeEverything, case_sensitive)
    }

    pub fn with_columns(
        pattern: Option<&str>,
        columns: PatternFilter,
        case_sensitive: bool,
    ) -> FilterResult<Self> {
        let pattern = pattern
            .map(|p| Pattern::new(p, case_sensitive))
            .transpose()?;
        Ok(Self {
            pattern,
            columns,
            case_sensitive,
        })
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn columns(&self) -> &PatternFilter {
        &self.columns
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn matches(&self, table: &str) -> bool {
        self.pattern.as_ref().map_or(true, |p| p.matches(table))
    }
}

/// Table inclusion rules for one (catalog, schema) scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableFilter {
    includes: Vec<IncludeTableFilter>,
    excludes: Vec<Pattern>,
}

impl TableFilter {
    pub fn new(includes: Vec<IncludeTableFilter>, excludes: Vec<Pattern>) -> Self {
        Self { includes, excludes }
    }

    /// Every table, every column.
    pub fn everything() -> Self {
        Self {
            includes: vec![IncludeTableFilter {
                pattern: None,
                columns: PatternFilter::IncludeEverything,
                case_sensitive: true,
            }],
            excludes: Vec::new(),
        }
    }

    /// Tables matching `pattern` (every table for `None`), every column.
    pub fn include(pattern: Option<&str>) -> FilterResult<Self> {
        Ok(Self {
            includes: vec![IncludeTableFilter::new(pattern, true)?],
            excludes: Vec::new(),
        })
    }

    /// Append an include-table entry; entries are evaluated in insertion order.
    pub fn with_include(mut self, entry: IncludeTableFilter) -> Self {
        self.includes.push(entry);
        self
    }

    /// Append an exclude-table pattern.
    pub fn with_exclude(mut self, pattern: &str, case_sensitive: bool) -> FilterResult<Self> {
        self.excludes.push(Pattern::new(pattern, case_sensitive)?);
        Ok(self)
    }

    pub fn includes(&self) -> &[IncludeTableFilter] {
        &self.includes
    }

    pub fn excludes(&self) -> &[Pattern] {
        &self.excludes
    }

    fn is_excluded(&self, table: &str) -> bool {
        self.excludes.iter().any(|p| p.matches(table))
    }

    pub fn is_include_table(&self, table: &str) -> bool {
        self.include_table_column_filter(table).is_some()
    }

    /// Column filter of the first include entry admitting `table`.
    ///
    /// `None` when no entry matches or an exclude pattern rejects the name;
    /// excludes are applied regardless of which entry matched.
    pub fn include_table_column_filter(&self, table: &str) -> Option<&PatternFilter> {
        let entry = self.includes.iter().find(|e| e.matches(table))?;
        if self.is_excluded(table) {
            return None;
        }
        Some(&entry.columns)
    }

    pub(crate) fn render(&self, w: &mut TreeWriter) {
        for entry in &self.includes {
            let pattern = entry.pattern.as_ref().map(Pattern::as_str);
            w.entry("IncludeTable", display_name(pattern));
            w.nested(|w| entry.columns.render(w, "IncludeColumn", "ExcludeColumn"));
        }
        w.entries("ExcludeTable", self.excludes.iter().map(Pattern::as_str));
    }
}
