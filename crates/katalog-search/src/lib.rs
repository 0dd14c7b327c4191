//! Search configuration and query construction for Katalog.
//!
//! This crate declares how the catalog talks to its search index: which
//! fields become facets, result-list columns and detail-page rows, which
//! named search fields exist and how they override engine parameters, and
//! which sort orders are offered.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      katalog-search                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FieldRegistry (facets, list, show, search fields)          │
//! │  SortRegistry (named sort expressions, first = default)     │
//! │  SearchConfigBuilder → SearchConfig (validated, immutable)  │
//! │  catalog_config() (the NEOS catalog registrations)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  QueryBuilder: SearchRequest → IndexQuery → engine params   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IndexBackend trait                                         │
//! │  └── MemoryIndex (linear scan fallback)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use katalog_search::{FacetFieldDef, SearchConfig, SearchFieldDef, SortFieldDef};
//!
//! let config = SearchConfig::builder()
//!     .register_facet(FacetFieldDef::new("format", "Format").limit(10))
//!     .register_search_field(SearchFieldDef::from_key("all_fields"))
//!     .register_sort(SortFieldDef::new("score desc, title_sort asc", "relevance"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.default_sort().unwrap().label, "relevance");
//! ```

pub mod backend;
pub mod catalog;
pub mod config;
pub mod memory;
pub mod query;
pub mod registry;
pub mod types;

// Re-exports
pub use backend::{FacetCounts, FacetValue, IndexBackend, SearchResponse};
pub use catalog::{catalog_builder, catalog_config};
pub use config::{
    AdvancedSearchConfig, GlobalQueryDefaults, IndexViewConfig, SearchConfig,
    SearchConfigBuilder,
};
pub use memory::MemoryIndex;
pub use query::{Filter, IndexQuery, QueryBuilder, RangeBounds, SearchRequest};
pub use registry::{FieldRegistry, SortRegistry};
pub use types::{
    DisplayFieldDef, EngineParam, FacetFieldDef, FacetSort, ListFieldDef, LocalParam,
    SearchFieldDef, ShowFieldDef, SortClause, SortDirection, SortFieldDef,
};
