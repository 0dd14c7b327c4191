//! List and detail flows.
//!
//! [`CatalogService`] ties the index, the holdings service and the
//! enricher together. The brand is resolved by the caller (usually the
//! [`BrandLayer`](katalog_brand::BrandLayer) middleware) and passed in per
//! call, so nothing request-specific is stored on the service.

use std::sync::Arc;

use katalog_brand::LibraryBrand;
use katalog_core::{RawRecord, Result};
use katalog_search::{IndexBackend, SearchConfig, SearchRequest, SearchResponse};
use serde::Serialize;

use crate::enrich::{EnrichedRecord, RecordEnricher};
use crate::holdings::HoldingsService;

/// Everything the result-list page needs.
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    /// Brand for this request.
    pub brand: LibraryBrand,
    /// Index results.
    pub response: SearchResponse,
    /// Whether the page should offer spelling suggestions.
    pub spelling_suggestions: bool,
}

/// Everything the detail page needs.
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    /// Brand for this request.
    pub brand: LibraryBrand,
    /// The record as stored in the index.
    pub record: RawRecord,
    /// Derived display data.
    pub enriched: EnrichedRecord,
}

/// Shared, read-only catalog service.
#[derive(Clone)]
pub struct CatalogService {
    index: Arc<dyn IndexBackend>,
    holdings: Arc<dyn HoldingsService>,
    config: Arc<SearchConfig>,
    enricher: RecordEnricher,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("index", &self.index.name())
            .field("holdings", &self.holdings.name())
            .field("enricher", &self.enricher)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    /// Create a service with the default enricher fields.
    pub fn new(
        index: Arc<dyn IndexBackend>,
        holdings: Arc<dyn HoldingsService>,
        config: Arc<SearchConfig>,
    ) -> Self {
        Self {
            index,
            holdings,
            config,
            enricher: RecordEnricher::default(),
        }
    }

    /// Replace the enricher.
    pub fn with_enricher(mut self, enricher: RecordEnricher) -> Self {
        self.enricher = enricher;
        self
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a list-view search.
    ///
    /// # Errors
    ///
    /// Not-found errors for unknown search fields or sorts; upstream errors
    /// from the index.
    pub async fn index(&self, brand: LibraryBrand, request: &SearchRequest) -> Result<ListView> {
        let response = self.index.search(&self.config, request).await?;
        let spelling_suggestions = self.config.offers_spelling_suggestion(response.total);
        log::debug!(
            "[{}] list: q='{}' total={}",
            brand.brand_id,
            request.q,
            response.total
        );

        Ok(ListView {
            brand,
            response,
            spelling_suggestions,
        })
    }

    /// Build the detail view for one record.
    ///
    /// Malformed holdings do not fail the page: holdings are omitted, both
    /// flags are false and the reason is recorded in
    /// [`EnrichedRecord::holdings_omitted`].
    ///
    /// # Errors
    ///
    /// A not-found error for an unknown record; upstream errors from the
    /// index or the holdings service.
    pub async fn show(&self, brand: LibraryBrand, id: &str) -> Result<DetailView> {
        let record = self.index.fetch(id).await?;
        let items = self.holdings.items(id).await?;

        let mut enriched = match self.enricher.enrich(&record, items) {
            Ok(enriched) => enriched,
            Err(err) if err.is_data() => {
                log::warn!("[{}] record {id}: omitting holdings: {err}", brand.brand_id);
                let mut enriched = self.enricher.enrich(&record, Vec::new())?;
                enriched.holdings_omitted = Some(err.to_string());
                enriched
            }
            Err(err) => return Err(err),
        };

        if enriched.fulltext_urls.is_some() {
            let links = self.holdings.links(id).await?;
            if !links.is_empty() {
                enriched.fulltext_urls = Some(links.into_iter().map(|l| l.url).collect());
            }
        }

        log::debug!(
            "[{}] detail: id={id} holdings={}",
            brand.brand_id,
            enriched.holdings.len()
        );
        Ok(DetailView {
            brand,
            record,
            enriched,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::holdings::{HoldingEntry, HoldingLink, StaticHoldings};
    use katalog_search::{GlobalQueryDefaults, MemoryIndex, catalog_config};
    use serde_json::json;

    fn brand() -> LibraryBrand {
        LibraryBrand {
            brand_id: "neos".to_string(),
            name: "NEOS".to_string(),
            home_url: "https://www.neoslibraries.ca".to_string(),
            secondary_portal_url: "https://www.neoslibraries.ca".to_string(),
        }
    }

    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord::new()
                .with("id", "r1")
                .with("title_display", "Prairie Fire")
                .with("format", "Book"),
            RawRecord::new()
                .with("id", "r2")
                .with("url_fulltext_display", json!(["https://old.example.org/r2"])),
            RawRecord::new().with("id", "r3").with("title_display", "Prairie Songs"),
        ]
    }

    fn service(holdings: StaticHoldings) -> CatalogService {
        CatalogService::new(
            Arc::new(MemoryIndex::new(records())),
            Arc::new(holdings),
            Arc::new(catalog_config(GlobalQueryDefaults::default()).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_index_flags_spelling() {
        let view = service(StaticHoldings::new())
            .index(brand(), &SearchRequest::new("prairie"))
            .await
            .unwrap();
        assert_eq!(view.response.total, 2);
        assert!(view.spelling_suggestions);
        assert_eq!(view.brand.brand_id, "neos");
    }

    #[tokio::test]
    async fn test_show_sorts_holdings() {
        let holdings = StaticHoldings::new().with_items(
            "r1",
            vec![
                HoldingEntry::at("Annex").holdable(false),
                HoldingEntry::at("main").holdable(true),
            ],
        );
        let view = service(holdings).show(brand(), "r1").await.unwrap();
        assert_eq!(view.enriched.title, "Prairie Fire");
        assert_eq!(view.enriched.holdings[0].location.as_deref(), Some("main"));
        assert!(view.enriched.holdable);
        assert!(view.enriched.holdings_omitted.is_none());
    }

    #[tokio::test]
    async fn test_show_degrades_on_malformed_holdings() {
        let holdings = StaticHoldings::new().with_items(
            "r1",
            vec![HoldingEntry::at("main").holdable(true), HoldingEntry::default()],
        );
        let view = service(holdings).show(brand(), "r1").await.unwrap();
        assert!(view.enriched.holdings.is_empty());
        assert!(!view.enriched.holdable);
        assert!(!view.enriched.bookable);
        assert!(view.enriched.holdings_omitted.unwrap().contains("entry 1"));
        assert_eq!(view.enriched.title, "Prairie Fire");
    }

    #[tokio::test]
    async fn test_show_uses_links_for_fulltext() {
        let holdings = StaticHoldings::new().with_links(
            "r2",
            vec![
                HoldingLink::new("https://proxy.example.org/r2"),
                HoldingLink::new("https://mirror.example.org/r2"),
            ],
        );
        let view = service(holdings).show(brand(), "r2").await.unwrap();
        assert_eq!(view.enriched.title, "Untitled document");
        assert_eq!(
            view.enriched.fulltext_urls,
            Some(vec![
                "https://proxy.example.org/r2".to_string(),
                "https://mirror.example.org/r2".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_show_keeps_record_urls_without_links() {
        let view = service(StaticHoldings::new())
            .show(brand(), "r2")
            .await
            .unwrap();
        assert_eq!(
            view.enriched.fulltext_urls,
            Some(vec!["https://old.example.org/r2".to_string()])
        );
    }

    #[tokio::test]
    async fn test_show_unknown_record() {
        let err = service(StaticHoldings::new())
            .show(brand(), "nope")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_show_propagates_holdings_failure() {
        let err = service(StaticHoldings::new().failing_for("r1"))
            .show(brand(), "r1")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }
}
