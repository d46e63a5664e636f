//! Whole-string regular expression include/exclude predicate.

use std::fmt;

use regex::{Regex, RegexBuilder};

use super::format::TreeWriter;
use super::{FilterError, FilterResult};

/// A compiled name pattern.
///
/// The declared text is kept verbatim for renderings and equality; the
/// compiled regex is anchored on both ends so only whole names match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    case_sensitive: bool,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` into a whole-string matcher.
    ///
    /// Case-insensitivity is a regex flag; names are never case-folded before
    /// matching, so callers keep the casing reported by the database.
    pub fn new(source: &str, case_sensitive: bool) -> FilterResult<Self> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", source))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| FilterError::InvalidPattern {
                pattern: source.to_string(),
                source: e,
            })?;

        Ok(Self {
            source: source.to_string(),
            case_sensitive,
            regex,
        })
    }

    /// The pattern text as declared.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether `name` matches this pattern in full.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_sensitive == other.case_sensitive
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Ordered include and exclude pattern lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRules {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
    case_sensitive: bool,
}

impl PatternRules {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            case_sensitive,
        }
    }

    pub fn includes(&self) -> &[Pattern] {
        &self.includes
    }

    pub fn excludes(&self) -> &[Pattern] {
        &self.excludes
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    fn is_included(&self, name: &str) -> bool {
        let included =
            self.includes.is_empty() || self.includes.iter().any(|p| p.matches(name));
        included && !self.excludes.iter().any(|p| p.matches(name))
    }
}

/// Include/exclude predicate over names.
///
/// The two sentinel variants short-circuit: they do not consult any pattern
/// and answer the same for every input, including the empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternFilter {
    /// Admits every name.
    IncludeEverything,
    /// Admits no name.
    IncludeNothing,
    /// Admits names by pattern; no include patterns means "every name".
    Rules(PatternRules),
}

impl Default for PatternFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PatternFilter {
    /// An empty rule set with the given case sensitivity.
    pub fn new(case_sensitive: bool) -> Self {
        Self::Rules(PatternRules::new(case_sensitive))
    }

    /// Append an include pattern.
    ///
    /// Called on a sentinel, this starts a fresh case-sensitive rule set.
    pub fn include(self, pattern: &str) -> FilterResult<Self> {
        let mut rules = self.into_rules();
        rules
            .includes
            .push(Pattern::new(pattern, rules.case_sensitive)?);
        Ok(Self::Rules(rules))
    }

    /// Append an exclude pattern.
    ///
    /// Called on a sentinel, this starts a fresh case-sensitive rule set.
    pub fn exclude(self, pattern: &str) -> FilterResult<Self> {
        let mut rules = self.into_rules();
        rules
            .excludes
            .push(Pattern::new(pattern, rules.case_sensitive)?);
        Ok(Self::Rules(rules))
    }

    /// Build a rule set from declared pattern lists.
    ///
    /// An empty declaration compiles to `empty`, so callers choose whether
    /// "nothing declared" means everything or nothing.
    pub fn from_patterns(
        includes: &[String],
        excludes: &[String],
        case_sensitive: bool,
        empty: PatternFilter,
    ) -> FilterResult<Self> {
        if includes.is_empty() && excludes.is_empty() {
            return Ok(empty);
        }

        let mut rules = PatternRules::new(case_sensitive);
        for pattern in includes {
            rules.includes.push(Pattern::new(pattern, case_sensitive)?);
        }
        for pattern in excludes {
            rules.excludes.push(Pattern::new(pattern, case_sensitive)?);
        }
        Ok(Self::Rules(rules))
    }

    fn into_rules(self) -> PatternRules {
        match self {
            Self::Rules(rules) => rules,
            Self::IncludeEverything | Self::IncludeNothing => PatternRules::new(true),
        }
    }

    pub fn is_included(&self, name: &str) -> bool {
        match self {
            Self::IncludeEverything => true,
            Self::IncludeNothing => false,
            Self::Rules(rules) => rules.is_included(name),
        }
    }

    /// Same as [`is_included`](Self::is_included) for names a driver may omit.
    pub fn is_included_opt(&self, name: Option<&str>) -> bool {
        match self {
            Self::IncludeEverything => true,
            Self::IncludeNothing => false,
            Self::Rules(rules) => rules.is_included(name.unwrap_or("")),
        }
    }

    /// True when no include or exclude pattern has been declared.
    ///
    /// Sentinels are never "empty": they carry an explicit answer.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Rules(rules) if rules.is_empty())
    }

    pub fn includes(&self) -> &[Pattern] {
        match self {
            Self::Rules(rules) => rules.includes(),
            _ => &[],
        }
    }

    pub fn excludes(&self) -> &[Pattern] {
        match self {
            Self::Rules(rules) => rules.excludes(),
            _ => &[],
        }
    }

    /// Write the declared patterns as `<Include>: p` / `<Exclude>: p` lines.
    pub(crate) fn render(&self, w: &mut TreeWriter, include_label: &str, exclude_label: &str) {
        w.entries(include_label, self.includes().iter().map(Pattern::as_str));
        w.entries(exclude_label, self.excludes().iter().map(Pattern::as_str));
    }
}

impl fmt::Display for PatternFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncludeEverything => f.write_str("ALL"),
            Self::IncludeNothing => f.write_str("NONE"),
            Self::Rules(rules) => {
                let includes: Vec<&str> = rules.includes.iter().map(Pattern::as_str).collect();
                let excludes: Vec<&str> = rules.excludes.iter().map(Pattern::as_str).collect();
                write!(
                    f,
                    "include [{}] exclude [{}]",
                    includes.join(", "),
                    excludes.join(", ")
                )
            }
        }
    }
}
