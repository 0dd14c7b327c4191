//! Query construction.
//!
//! [`QueryBuilder`] resolves a user-facing [`SearchRequest`] against a
//! [`SearchConfig`] and produces an [`IndexQuery`]: the search field's local
//! and plain parameters, the resolved sort, paging, facet requests and
//! filters. [`IndexQuery::to_params`] flattens it into engine parameters.

use std::collections::BTreeMap;

use katalog_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::types::{EngineParam, FacetSort, SortClause};

/// Largest page size a request may ask for.
pub const MAX_PER_PAGE: usize = 100;

/// Inclusive bounds for a range facet; an open end is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// A search as requested by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query terms.
    #[serde(default)]
    pub q: String,

    /// Search field key; defaults to the first registered field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_field: Option<String>,

    /// Sort expression or label; defaults to the first registered sort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,

    /// Page size override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,

    /// Selected facet values, by facet field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facet_filters: BTreeMap<String, Vec<String>>,

    /// Selected ranges, by range facet field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub range_filters: BTreeMap<String, RangeBounds>,

    /// Submitted from the advanced-search form.
    #[serde(default)]
    pub advanced: bool,
}

impl SearchRequest {
    /// Request for `q` with every other setting defaulted.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Default::default()
        }
    }

    /// Select a search field.
    pub fn with_search_field(mut self, key: impl Into<String>) -> Self {
        self.search_field = Some(key.into());
        self
    }

    /// Select a sort.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Select a page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Add a facet value filter.
    pub fn with_facet(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.facet_filters
            .entry(field.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Add a range filter.
    pub fn with_range(
        mut self,
        field: impl Into<String>,
        begin: Option<&str>,
        end: Option<&str>,
    ) -> Self {
        self.range_filters.insert(
            field.into(),
            RangeBounds {
                begin: begin.map(str::to_string),
                end: end.map(str::to_string),
            },
        );
        self
    }
}

/// A filter query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Exact facet value.
    Term {
        /// Facet field.
        field: String,
        /// Selected value.
        value: String,
    },
    /// Inclusive range on a range facet.
    Range {
        /// Range facet field.
        field: String,
        /// Bounds.
        bounds: RangeBounds,
    },
}

impl Filter {
    /// Engine syntax for this filter.
    pub fn to_fq(&self) -> String {
        match self {
            Filter::Term { field, value } => format!("{{!term f={field}}}{value}"),
            Filter::Range { field, bounds } => format!(
                "{field}:[{} TO {}]",
                bounds.begin.as_deref().unwrap_or("*"),
                bounds.end.as_deref().unwrap_or("*")
            ),
        }
    }
}

/// How one facet is requested from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// Facet field.
    pub field: String,
    /// Values to request (display limit + 1).
    pub limit: Option<usize>,
    /// Value ordering.
    pub sort: FacetSort,
}

/// A resolved query, ready for an index backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexQuery {
    /// Raw query terms, trimmed.
    pub q: String,
    /// Resolved search field key.
    pub search_field: Option<String>,
    /// Local-params prefix of the search field (may be empty).
    pub local_params: String,
    /// Plain parameters of the search field and advanced form.
    pub params: BTreeMap<EngineParam, String>,
    /// Request handler override.
    pub handler: Option<String>,
    /// Page size.
    pub rows: usize,
    /// Offset of the first result.
    pub start: usize,
    /// Resolved sort expression.
    pub sort_key: Option<String>,
    /// Parsed sort clauses.
    pub sort: Vec<SortClause>,
    /// Facets to count.
    pub facets: Vec<FacetRequest>,
    /// Filters to apply.
    pub filters: Vec<Filter>,
}

impl IndexQuery {
    /// Query string as sent to the engine: local params followed by terms.
    pub fn query_string(&self) -> String {
        format!("{}{}", self.local_params, self.q)
    }

    /// Flatten into engine request parameters, in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if !self.q.is_empty() {
            out.push(("q".to_string(), self.query_string()));
        }
        if let Some(qt) = &self.handler {
            out.push(("qt".to_string(), qt.clone()));
        }
        for (name, value) in &self.params {
            out.push((name.as_str().to_string(), value.clone()));
        }
        out.push(("rows".to_string(), self.rows.to_string()));
        out.push(("start".to_string(), self.start.to_string()));
        if let Some(sort) = &self.sort_key {
            out.push(("sort".to_string(), sort.clone()));
        }
        if !self.facets.is_empty() {
            out.push(("facet".to_string(), "true".to_string()));
        }
        for facet in &self.facets {
            out.push(("facet.field".to_string(), facet.field.clone()));
        }
        for facet in &self.facets {
            if let Some(limit) = facet.limit {
                out.push((format!("f.{}.facet.limit", facet.field), limit.to_string()));
            }
            if facet.sort == FacetSort::Index {
                out.push((
                    format!("f.{}.facet.sort", facet.field),
                    FacetSort::Index.as_str().to_string(),
                ));
            }
        }
        for filter in &self.filters {
            out.push(("fq".to_string(), filter.to_fq()));
        }
        out
    }
}

/// Builds [`IndexQuery`] values from requests.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    config: &'a SearchConfig,
}

impl<'a> QueryBuilder<'a> {
    /// Create a builder over a configuration.
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// Resolve a request.
    ///
    /// # Errors
    ///
    /// Not-found errors for an unknown search field, sort, facet or range
    /// facet named by the request.
    pub fn build(&self, request: &SearchRequest) -> Result<IndexQuery> {
        let fields = self.config.fields();

        let search_field = match request.search_field.as_deref() {
            Some(key) => Some(
                fields
                    .search_field(key)
                    .ok_or_else(|| Error::not_found("search field", key))?,
            ),
            None => fields.default_search_field(),
        };

        let sort_def = match request.sort.as_deref() {
            Some(key) => Some(
                self.config
                    .sorts()
                    .find(key)
                    .ok_or_else(|| Error::not_found("sort", key))?,
            ),
            None => self.config.default_sort(),
        };
        let sort = match sort_def {
            Some(def) => def.clauses()?,
            None => Vec::new(),
        };

        let mut params = search_field
            .map(|f| f.query_engine_params.clone())
            .unwrap_or_default();
        if request.advanced {
            let advanced = &self.config.defaults().advanced_search;
            params.insert(EngineParam::DefType, advanced.query_parser.clone());
            params.extend(advanced.typed_form_params()?);
        }

        let rows = request
            .per_page
            .filter(|n| *n > 0)
            .unwrap_or(self.config.defaults().page_size)
            .min(MAX_PER_PAGE);
        let page = request.page.unwrap_or(1).max(1);

        let facets = self
            .config
            .facets()
            .iter()
            .map(|f| FacetRequest {
                field: f.field_key.clone(),
                limit: f.request_limit(),
                sort: f.sort_mode,
            })
            .collect();

        let mut filters = Vec::new();
        for (field, values) in &request.facet_filters {
            if fields.facet(field).is_none() {
                return Err(Error::not_found("facet", field.clone()));
            }
            filters.extend(values.iter().map(|value| Filter::Term {
                field: field.clone(),
                value: value.clone(),
            }));
        }
        for (field, bounds) in &request.range_filters {
            match fields.facet(field) {
                Some(facet) if facet.is_range => filters.push(Filter::Range {
                    field: field.clone(),
                    bounds: bounds.clone(),
                }),
                _ => return Err(Error::not_found("range facet", field.clone())),
            }
        }

        let query = IndexQuery {
            q: request.q.trim().to_string(),
            search_field: search_field.map(|f| f.key.clone()),
            local_params: search_field
                .map(|f| f.local_params_prefix())
                .unwrap_or_default(),
            params,
            handler: search_field.and_then(|f| f.query_handler.clone()),
            rows,
            start: (page - 1).saturating_mul(rows),
            sort_key: sort_def.map(|s| s.sort_key.clone()),
            sort,
            facets,
            filters,
        };
        log::debug!(
            "Built index query: q='{}', field={:?}, sort={:?}, start={}, rows={}, filters={}",
            query.q,
            query.search_field,
            query.sort_key,
            query.start,
            query.rows,
            query.filters.len()
        );
        Ok(query)
    }
}

// ============================================================================
// Tests
// ============================================================================
