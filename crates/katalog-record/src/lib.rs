//! Record enrichment and catalog flows for Katalog.
//!
//! - [`holdings`]: the external holdings service contract and a static implementation
//! - [`enrich`]: [`RecordEnricher`], deriving detail-page data from a record and its holdings
//! - [`service`]: [`CatalogService`], the list and detail flows
//! - [`routes`]: JSON routes with per-request brand resolution
//!
//! # Example
//!
//! ```rust
//! use katalog_core::RawRecord;
//! use katalog_record::{HoldingEntry, RecordEnricher};
//!
//! let record = RawRecord::new().with("subject_t", serde_json::json!(["Fiction--Mystery"]));
//! let holdings = vec![HoldingEntry::at("Annex"), HoldingEntry::at("main")];
//!
//! let enriched = RecordEnricher::default().enrich(&record, holdings).unwrap();
//! assert_eq!(enriched.title, "Untitled document");
//! assert_eq!(enriched.holdings[0].location.as_deref(), Some("main"));
//! ```

pub mod enrich;
pub mod holdings;
pub mod routes;
pub mod service;

pub use enrich::{EnrichedRecord, RecordEnricher, RecordFields, UNTITLED};
pub use holdings::{
    HoldingEntry, HoldingLink, Holdings, HoldingsMode, HoldingsService, StaticHoldings,
};
pub use routes::{router, search_request_from_query};
pub use service::{CatalogService, DetailView, ListView};
