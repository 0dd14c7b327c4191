//! Field, search-field and sort definitions.
//!
//! These are the rows of the catalog configuration. Each kind accepts only a
//! fixed set of overrides:
//!
//! | Kind | Overrides |
//! |------|-----------|
//! | facet | `sort_mode`, `limit`, `is_range`, `collapsed` |
//! | list / show | `separator` |
//! | search | [`EngineParam`] map, [`LocalParam`] map, `query_handler` |
//! | sort | none (the key is the ordering expression) |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use katalog_core::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Facets
// ============================================================================

/// Ordering of facet values as returned by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetSort {
    /// Most frequent values first.
    #[default]
    Count,
    /// Lexical order of the values.
    Index,
}

impl FacetSort {
    /// Name understood by the index engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetSort::Count => "count",
            FacetSort::Index => "index",
        }
    }
}

/// A categorical filter shown with counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFieldDef {
    /// Index field backing the facet.
    pub field_key: String,
    /// Display label.
    pub label: String,
    /// Value ordering.
    #[serde(default)]
    pub sort_mode: FacetSort,
    /// Number of values displayed before "more"; `None` shows everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Numeric range facet (e.g. publication year).
    #[serde(default)]
    pub is_range: bool,
    /// Rendered collapsed in the facet bar.
    #[serde(default = "default_collapsed")]
    pub collapsed: bool,
}

fn default_collapsed() -> bool {
    true
}

impl FacetFieldDef {
    /// New facet with count ordering, no limit, collapsed.
    pub fn new(field_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            label: label.into(),
            sort_mode: FacetSort::Count,
            limit: None,
            is_range: false,
            collapsed: default_collapsed(),
        }
    }

    /// Set the value ordering.
    pub fn sort(mut self, sort_mode: FacetSort) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    /// Limit the number of displayed values.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Mark as a range facet.
    pub fn range(mut self) -> Self {
        self.is_range = true;
        self
    }

    /// Set whether the facet starts collapsed.
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Limit to request from the index: one extra value signals "more".
    pub fn request_limit(&self) -> Option<usize> {
        self.limit.map(|n| n.saturating_add(1))
    }
}

// ============================================================================
// List / show fields
// ============================================================================

/// A field rendered in the result list or on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFieldDef {
    /// Index field to render.
    pub field_key: String,
    /// Display label.
    pub label: String,
    /// Joiner for multi-valued fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

/// A result-list column.
pub type ListFieldDef = DisplayFieldDef;

/// A detail-page row.
pub type ShowFieldDef = DisplayFieldDef;

impl DisplayFieldDef {
    /// New display field without a separator.
    pub fn new(field_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            label: label.into(),
            separator: None,
        }
    }

    /// Join multiple values with `separator`.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

// ============================================================================
// Search fields
// ============================================================================

/// Request parameters a search field may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EngineParam {
    /// `spellcheck.dictionary`
    #[serde(rename = "spellcheck.dictionary")]
    SpellcheckDictionary,
    /// `defType`
    #[serde(rename = "defType")]
    DefType,
    /// `qf`
    #[serde(rename = "qf")]
    QueryFields,
    /// `pf`
    #[serde(rename = "pf")]
    PhraseFields,
    /// `mm`
    #[serde(rename = "mm")]
    MinimumMatch,
}

impl EngineParam {
    /// Every recognised key.
    pub const ALL: [EngineParam; 5] = [
        EngineParam::SpellcheckDictionary,
        EngineParam::DefType,
        EngineParam::QueryFields,
        EngineParam::PhraseFields,
        EngineParam::MinimumMatch,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineParam::SpellcheckDictionary => "spellcheck.dictionary",
            EngineParam::DefType => "defType",
            EngineParam::QueryFields => "qf",
            EngineParam::PhraseFields => "pf",
            EngineParam::MinimumMatch => "mm",
        }
    }
}

impl fmt::Display for EngineParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineParam {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::config(format!("unrecognised engine parameter '{s}'")))
    }
}

/// Local parameters (`{!k=v}` prefix on the query) a search field may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalParam {
    /// Query fields.
    Qf,
    /// Phrase fields.
    Pf,
    /// Minimum-should-match.
    Mm,
}

impl LocalParam {
    /// Every recognised key.
    pub const ALL: [LocalParam; 3] = [LocalParam::Qf, LocalParam::Pf, LocalParam::Mm];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocalParam::Qf => "qf",
            LocalParam::Pf => "pf",
            LocalParam::Mm => "mm",
        }
    }
}

impl fmt::Display for LocalParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocalParam {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::config(format!("unrecognised local parameter '{s}'")))
    }
}

/// A named search field selectable from the search box.
///
/// The `key` appears in URLs and bookmarks, so it must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFieldDef {
    /// URL key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Plain request parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_engine_params: BTreeMap<EngineParam, String>,
    /// Local parameters prefixed to the query string.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_engine_local_params: BTreeMap<LocalParam, String>,
    /// Request handler override (`qt`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_handler: Option<String>,
}

impl SearchFieldDef {
    /// New search field with an explicit label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            query_engine_params: BTreeMap::new(),
            query_engine_local_params: BTreeMap::new(),
            query_handler: None,
        }
    }

    /// New search field whose label is derived from the key.
    ///
    /// ```
    /// use katalog_search::SearchFieldDef;
    ///
    /// assert_eq!(SearchFieldDef::from_key("all_fields").label, "All Fields");
    /// ```
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let label = humanize(&key);
        Self::new(key, label)
    }

    /// Override a request parameter.
    pub fn param(mut self, name: EngineParam, value: impl Into<String>) -> Self {
        self.query_engine_params.insert(name, value.into());
        self
    }

    /// Set a local parameter.
    pub fn local_param(mut self, name: LocalParam, value: impl Into<String>) -> Self {
        self.query_engine_local_params.insert(name, value.into());
        self
    }

    /// Route queries to a different request handler.
    pub fn handler(mut self, qt: impl Into<String>) -> Self {
        self.query_handler = Some(qt.into());
        self
    }

    /// Local-params prefix, e.g. `{!qf=$title_qf pf=$title_pf}`; empty when unset.
    pub fn local_params_prefix(&self) -> String {
        if self.query_engine_local_params.is_empty() {
            return String::new();
        }
        let pairs: Vec<String> = self
            .query_engine_local_params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{{!{}}}", pairs.join(" "))
    }
}

/// Turn `snake_case` into `Title Case`.
pub fn humanize(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Sorts
// ============================================================================

/// Direction of a single sort clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// One `field direction` pair of a sort expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    /// Field to order by (`score` means relevance).
    pub field: String,
    /// Ordering direction.
    pub direction: SortDirection,
}

/// A named result ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortFieldDef {
    /// Raw multi-key expression, e.g. `score desc, pub_date_sort desc`.
    pub sort_key: String,
    /// Display label.
    pub label: String,
}

impl SortFieldDef {
    /// New sort definition.
    pub fn new(sort_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            sort_key: sort_key.into(),
            label: label.into(),
        }
    }

    /// Parse the expression into clauses.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless every comma-separated clause is
    /// `<field> asc` or `<field> desc`.
    pub fn clauses(&self) -> Result<Vec<SortClause>> {
        let mut clauses = Vec::new();
        for raw in self.sort_key.split(',') {
            let parts: Vec<&str> = raw.split_whitespace().collect();
            let [field, direction] = parts.as_slice() else {
                return Err(Error::config(format!(
                    "sort '{}': clause '{}' must be '<field> asc|desc'",
                    self.label,
                    raw.trim()
                )));
            };
            let direction = match direction.to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => {
                    return Err(Error::config(format!(
                        "sort '{}': direction '{other}' must be asc or desc",
                        self.label
                    )));
                }
            };
            clauses.push(SortClause {
                field: (*field).to_string(),
                direction,
            });
        }
        Ok(clauses)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_defaults() {
        let facet = FacetFieldDef::new("format", "Format");
        assert_eq!(facet.sort_mode, FacetSort::Count);
        assert!(facet.limit.is_none());
        assert!(!facet.is_range);
        assert!(facet.collapsed);
        assert_eq!(facet.request_limit(), None);
    }

    #[test]
    fn test_facet_request_limit_adds_one() {
        let facet = FacetFieldDef::new("format", "Format").limit(10);
        assert_eq!(facet.request_limit(), Some(11));
    }

    #[test]
    fn test_facet_request_limit_saturates() {
        let facet = FacetFieldDef::new("format", "Format").limit(usize::MAX);
        assert_eq!(facet.request_limit(), Some(usize::MAX));
    }

    #[test]
    fn test_facet_deserialization_defaults() {
        let facet: FacetFieldDef =
            serde_json::from_str(r#"{"field_key": "pub_date", "label": "Year"}"#).unwrap();
        assert!(facet.collapsed);
        assert_eq!(facet.sort_mode, FacetSort::Count);
    }

    #[test]
    fn test_display_field_separator() {
        let field = DisplayFieldDef::new("general_note_tesim", "General Note").separator(" -- ");
        assert_eq!(field.separator.as_deref(), Some(" -- "));
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("all_fields"), "All Fields");
        assert_eq!(humanize("title"), "Title");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_local_params_prefix() {
        let field = SearchFieldDef::from_key("title")
            .local_param(LocalParam::Pf, "$title_pf")
            .local_param(LocalParam::Qf, "$title_qf");
        assert_eq!(field.local_params_prefix(), "{!qf=$title_qf pf=$title_pf}");
        assert_eq!(SearchFieldDef::from_key("all_fields").local_params_prefix(), "");
    }

    #[test]
    fn test_engine_param_parse() {
        assert_eq!(
            "spellcheck.dictionary".parse::<EngineParam>().unwrap(),
            EngineParam::SpellcheckDictionary
        );
        assert!("facet.limit".parse::<EngineParam>().is_err());
        assert_eq!("pf".parse::<LocalParam>().unwrap(), LocalParam::Pf);
    }

    #[test]
    fn test_engine_param_serialization() {
        let field = SearchFieldDef::from_key("author")
            .param(EngineParam::SpellcheckDictionary, "author");
        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains(r#""spellcheck.dictionary":"author""#));
        assert!(!json.contains("query_handler"));
    }

    #[test]
    fn test_sort_clauses() {
        let sort = SortFieldDef::new("score desc, pub_date_sort desc, title_sort asc", "relevance");
        let clauses = sort.clauses().unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].field, "score");
        assert_eq!(clauses[0].direction, SortDirection::Desc);
        assert_eq!(clauses[2].direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_clauses_rejects_bad_direction() {
        let sort = SortFieldDef::new("title_sort up", "title");
        let err = sort.clauses().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_sort_clauses_rejects_missing_direction() {
        assert!(SortFieldDef::new("title_sort", "title").clauses().is_err());
        assert!(SortFieldDef::new("a asc,", "trailing").clauses().is_err());
    }
}
