//! In-memory linear-scan index.
//!
//! Used where a real search server is unavailable or unnecessary: tests,
//! offline tooling, and tiny collections.
//!
//! # Limitations
//!
//! - O(n) search time
//! - No stemming, no relevance scoring (`score` keeps insertion order)
//! - Case-insensitive substring matching only

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use katalog_core::{Error, RawRecord, Result};
use serde_json::Value;

use crate::backend::{FacetCounts, FacetValue, IndexBackend, SearchResponse};
use crate::config::SearchConfig;
use crate::query::{FacetRequest, Filter, IndexQuery, QueryBuilder, SearchRequest};
use crate::types::{FacetSort, SortClause, SortDirection};

/// Linear-scan index over records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    records: Vec<RawRecord>,
}

impl MemoryIndex {
    /// Index the given records, preserving their order.
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Load records from a JSON array of objects.
    ///
    /// # Errors
    ///
    /// A serialization error if the input is not an array of objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<RawRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn execute(&self, config: &SearchConfig, query: &IndexQuery) -> SearchResponse {
        let default_field = config.fields().default_search_field().map(|f| f.key.as_str());
        let scope = match query.search_field.as_deref() {
            Some(key) if Some(key) != default_field => Some(key),
            _ => None,
        };

        let mut hits: Vec<&RawRecord> = self
            .records
            .iter()
            .filter(|r| matches_terms(r, &query.q, scope))
            .filter(|r| query.filters.iter().all(|f| matches_filter(r, f)))
            .collect();

        let facets = query
            .facets
            .iter()
            .map(|request| count_facet(&hits, request))
            .collect();

        hits.sort_by(|a, b| compare_records(a, b, &query.sort));

        let total = hits.len();
        let docs = hits
            .into_iter()
            .skip(query.start)
            .take(query.rows)
            .cloned()
            .collect();

        SearchResponse {
            docs,
            total,
            start: query.start,
            rows: query.rows,
            facets,
            backend: self.name().to_string(),
        }
    }
}

#[async_trait]
impl IndexBackend for MemoryIndex {
    async fn search(
        &self,
        config: &SearchConfig,
        request: &SearchRequest,
    ) -> Result<SearchResponse> {
        let query = QueryBuilder::new(config).build(request)?;
        let response = self.execute(config, &query);
        log::debug!(
            "MemoryIndex: q='{}', total={}, returned={}",
            query.q,
            response.total,
            response.docs.len()
        );
        Ok(response)
    }

    async fn fetch(&self, id: &str) -> Result<RawRecord> {
        self.records
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or_else(|| Error::not_found("record", id))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Every query term must occur in some in-scope value.
///
/// With a `scope`, only fields whose name starts with it are searched
/// (`title` covers `title_display`, `title_addl_t`, ...).
fn matches_terms(record: &RawRecord, q: &str, scope: Option<&str>) -> bool {
    if q.is_empty() || q == "*" {
        return true;
    }

    let values: Vec<String> = record
        .iter()
        .filter(|(key, _)| scope.is_none_or(|s| key.starts_with(s)))
        .flat_map(|(key, _)| record.strings(key).unwrap_or_default())
        .map(|v| v.to_lowercase())
        .collect();

    q.to_lowercase()
        .split_whitespace()
        .all(|term| values.iter().any(|v| v.contains(term)))
}

fn matches_filter(record: &RawRecord, filter: &Filter) -> bool {
    match filter {
        Filter::Term { field, value } => record
            .strings(field)
            .is_some_and(|values| values.iter().any(|v| v == value)),
        Filter::Range { field, bounds } => {
            let begin = bounds.begin.as_deref().and_then(|b| b.parse::<f64>().ok());
            let end = bounds.end.as_deref().and_then(|e| e.parse::<f64>().ok());
            record.strings(field).is_some_and(|values| {
                values.iter().filter_map(|v| v.parse::<f64>().ok()).any(|n| {
                    begin.is_none_or(|b| n >= b) && end.is_none_or(|e| n <= e)
                })
            })
        }
    }
}

fn count_facet(hits: &[&RawRecord], request: &FacetRequest) -> FacetCounts {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in hits {
        for value in record.strings(&request.field).unwrap_or_default() {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut values: Vec<FacetValue> = counts
        .into_iter()
        .map(|(value, hits)| FacetValue { value, hits })
        .collect();
    match request.sort {
        FacetSort::Count => {
            values.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.value.cmp(&b.value)))
        }
        FacetSort::Index => values.sort_by(|a, b| a.value.cmp(&b.value)),
    }
    if let Some(limit) = request.limit {
        values.truncate(limit);
    }

    FacetCounts {
        field: request.field.clone(),
        values,
    }
}

#[derive(Debug, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn of(record: &RawRecord, field: &str) -> Option<Self> {
        let value = match record.get(field)? {
            Value::Array(items) => items.first()?,
            other => other,
        };
        match value {
            Value::Number(n) => n.as_f64().map(SortValue::Number),
            Value::String(s) => Some(SortValue::Text(s.to_lowercase())),
            _ => None,
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// Multi-key comparison; missing values sort last in either direction.
fn compare_records(a: &RawRecord, b: &RawRecord, clauses: &[SortClause]) -> Ordering {
    for clause in clauses {
        if clause.field == "score" {
            continue;
        }
        let ordering = match (SortValue::of(a, &clause.field), SortValue::of(b, &clause.field)) {
            (Some(x), Some(y)) => match clause.direction {
                SortDirection::Asc => x.cmp(&y),
                SortDirection::Desc => y.cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

// ============================================================================
// Tests
// ============================================================================
