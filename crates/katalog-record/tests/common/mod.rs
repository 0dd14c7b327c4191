//! Common fixtures for catalog integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use katalog_brand::{BrandResolver, BrandTable, BrandTableConfig};
use katalog_core::Result;
use katalog_record::{CatalogService, Holdings, HoldingsMode, HoldingsService, StaticHoldings};
use katalog_search::{GlobalQueryDefaults, MemoryIndex, catalog_config};

/// Brand table with the consortium default and one partner library.
pub const BRANDS_TOML: &str = r#"
default = "neos"

[libraries.neos]
name = "NEOS Library Consortium"
url = "https://www.neoslibraries.ca"
neosurl = "https://www.neoslibraries.ca"

[libraries.partnerlib]
name = "Partner Library"
url = "https://partner.example.org"
neosurl = "https://www.neoslibraries.ca/partner"
"#;

/// Records loaded into the in-memory index.
pub const RECORDS_JSON: &str = r#"[
    {"id": "untitled", "title_display": "",
     "subject_t": ["Fiction--Mystery"], "author_addl_t": ["Smith, J."]},
    {"id": "online", "title_display": "Northern Lights",
     "url_fulltext_display": ["https://record.example.org/online"]},
    {"id": "plain", "title_display": "Prairie Fire", "format": "Book"}
]"#;

/// Brand resolver over [`BRANDS_TOML`].
pub fn resolver() -> BrandResolver {
    let config: BrandTableConfig = toml::from_str(BRANDS_TOML).unwrap();
    BrandResolver::new(BrandTable::from_config(&config).unwrap())
}

/// Catalog service over [`RECORDS_JSON`] and the given holdings.
pub fn service(holdings: Arc<dyn HoldingsService>) -> CatalogService {
    CatalogService::new(
        Arc::new(MemoryIndex::from_json(RECORDS_JSON).unwrap()),
        holdings,
        Arc::new(catalog_config(GlobalQueryDefaults::default()).unwrap()),
    )
}

/// Holdings service that answers from a [`StaticHoldings`] after a delay.
pub struct SlowHoldings {
    pub inner: StaticHoldings,
    pub delay: Duration,
}

#[async_trait]
impl HoldingsService for SlowHoldings {
    async fn fetch(&self, record_id: &str, mode: HoldingsMode) -> Result<Holdings> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch(record_id, mode).await
    }
}

