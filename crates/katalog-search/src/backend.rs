//! Index backend trait and result types.
//!
//! The search index itself is an external collaborator. This module defines
//! the contract the rest of Katalog needs from it.
//!
//! # Backends
//!
//! - [`MemoryIndex`](crate::memory::MemoryIndex): linear scan over records
//!   held in memory, for small collections, tests and offline tooling
//!
//! # Example
//!
//! ```rust,ignore
//! use katalog_search::{IndexBackend, MemoryIndex, SearchRequest};
//!
//! let backend = MemoryIndex::new(records);
//! let response = backend.search(&config, &SearchRequest::new("prairie")).await?;
//! println!("Found {} results", response.total);
//! ```

use async_trait::async_trait;
use katalog_core::{RawRecord, Result};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::query::SearchRequest;

/// One facet value with its hit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    /// The value.
    pub value: String,
    /// Matching documents.
    pub hits: usize,
}

/// Counts for one facet field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCounts {
    /// Facet field.
    pub field: String,
    /// Values in the facet's configured order.
    pub values: Vec<FacetValue>,
}

/// A page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Documents on this page.
    pub docs: Vec<RawRecord>,

    /// Total number of matching documents (may be > docs.len()).
    pub total: usize,

    /// Offset of the first document.
    pub start: usize,

    /// Requested page size.
    pub rows: usize,

    /// Facet counts in configuration order.
    pub facets: Vec<FacetCounts>,

    /// Backend that executed the search.
    pub backend: String,
}

impl SearchResponse {
    /// Create empty results.
    pub fn empty(backend: &str) -> Self {
        Self {
            docs: Vec::new(),
            total: 0,
            start: 0,
            rows: 0,
            facets: Vec::new(),
            backend: backend.to_string(),
        }
    }

    /// Counts for a facet field.
    pub fn facet(&self, field: &str) -> Option<&FacetCounts> {
        self.facets.iter().find(|f| f.field == field)
    }
}

/// Abstract search index.
///
/// Implementations must be shareable across concurrent requests; the
/// configuration is passed by reference on every call and never stored
/// mutably.
#[async_trait]
pub trait IndexBackend: Send + Sync {
    /// Execute a list-view search.
    ///
    /// # Errors
    ///
    /// Not-found errors for unknown search fields, sorts or facets in the
    /// request; upstream errors when the index fails.
    async fn search(&self, config: &SearchConfig, request: &SearchRequest)
    -> Result<SearchResponse>;

    /// Fetch one record for the detail view.
    ///
    /// # Errors
    ///
    /// A not-found error when no record has this identifier.
    async fn fetch(&self, id: &str) -> Result<RawRecord>;

    /// Get the backend name for diagnostics.
    fn name(&self) -> &str;

    /// Check if the backend is ready to handle queries.
    fn is_ready(&self) -> bool {
        true
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
    fn test_search_response_empty() {
        let response = SearchResponse::empty("test-backend");
        assert!(response.docs.is_empty());
        assert_eq!(response.total, 0);
        assert_eq!(response.backend, "test-backend");
        assert!(response.facet("format").is_none());
    }

    #[test]
    fn test_search_response_serialization() {
        let response = SearchResponse {
            docs: vec![RawRecord::new().with("id", "r1")],
            total: 1,
            start: 0,
            rows: 10,
            facets: vec![FacetCounts {
                field: "format".to_string(),
                values: vec![FacetValue {
                    value: "Book".to_string(),
                    hits: 1,
                }],
            }],
            backend: "memory".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""id":"r1""#));
        assert!(json.contains(r#""hits":1"#));
        assert_eq!(response.facet("format").unwrap().values[0].value, "Book");
    }
}
