//! Library brands and their resolution.
//!
//! A deployment serves several libraries from one catalog. Each request may
//! carry a brand hint (the `lib` parameter) selecting which library's name
//! and portal links are shown. The table is loaded once at startup and is
//! read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use katalog_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Brand used when a request carries no hint.
pub const DEFAULT_BRAND: &str = "neos";

/// Request parameter carrying the brand hint.
pub const BRAND_PARAM: &str = "lib";

/// A library identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryBrand {
    /// Lookup key.
    pub brand_id: String,
    /// Display name.
    pub name: String,
    /// Library home page.
    pub home_url: String,
    /// Consortium portal page.
    pub secondary_portal_url: String,
}

/// One `[brands.libraries.<id>]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEntry {
    /// Display name.
    pub name: String,
    /// Library home page.
    #[serde(rename = "url")]
    pub home_url: String,
    /// Consortium portal page.
    #[serde(rename = "neosurl")]
    pub secondary_portal_url: String,
}

/// The `[brands]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandTableConfig {
    /// Key used when no hint is given.
    #[serde(default = "default_brand_key")]
    pub default: String,

    /// Brands by key.
    #[serde(default)]
    pub libraries: BTreeMap<String, BrandEntry>,
}

fn default_brand_key() -> String {
    DEFAULT_BRAND.to_string()
}

impl Default for BrandTableConfig {
    fn default() -> Self {
        let mut libraries = BTreeMap::new();
        libraries.insert(
            DEFAULT_BRAND.to_string(),
            BrandEntry {
                name: "NEOS Library Consortium".to_string(),
                home_url: "https://www.neoslibraries.ca".to_string(),
                secondary_portal_url: "https://www.neoslibraries.ca".to_string(),
            },
        );
        Self {
            default: default_brand_key(),
            libraries,
        }
    }
}

/// Validated, immutable brand lookup table.
#[derive(Debug, Clone)]
pub struct BrandTable {
    default_key: String,
    brands: HashMap<String, LibraryBrand>,
}

impl BrandTable {
    /// Build from configuration.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDefaultBrand`] if the default key has no entry, or a
    /// configuration error for an empty default key.
    pub fn from_config(config: &BrandTableConfig) -> Result<Self> {
        Self::new(
            config.default.clone(),
            config.libraries.iter().map(|(id, entry)| LibraryBrand {
                brand_id: id.clone(),
                name: entry.name.clone(),
                home_url: entry.home_url.clone(),
                secondary_portal_url: entry.secondary_portal_url.clone(),
            }),
        )
    }

    /// Build from brands directly.
    ///
    /// # Errors
    ///
    /// As for [`from_config`](Self::from_config).
    pub fn new(
        default_key: impl Into<String>,
        brands: impl IntoIterator<Item = LibraryBrand>,
    ) -> Result<Self> {
        let default_key = default_key.into();
        if default_key.is_empty() {
            return Err(Error::config("default brand key must not be empty"));
        }

        let brands: HashMap<String, LibraryBrand> = brands
            .into_iter()
            .map(|b| (b.brand_id.clone(), b))
            .collect();
        if !brands.contains_key(&default_key) {
            return Err(Error::MissingDefaultBrand { key: default_key });
        }

        log::debug!(
            "Brand table loaded: {} brands, default '{default_key}'",
            brands.len()
        );
        Ok(Self {
            default_key,
            brands,
        })
    }

    /// The default key.
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Look up a brand by key.
    pub fn get(&self, brand_id: &str) -> Option<&LibraryBrand> {
        self.brands.get(brand_id)
    }

    /// The default brand.
    pub fn default_brand(&self) -> &LibraryBrand {
        // Presence of the default key is checked at construction.
        &self.brands[&self.default_key]
    }

    /// Number of brands.
    pub fn len(&self) -> usize {
        self.brands.len()
    }

    /// Whether the table is empty (never true for a constructed table).
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

/// Resolves brand hints against a shared table.
///
/// Cheap to clone; holds no per-request state.
#[derive(Debug, Clone)]
pub struct BrandResolver {
    table: Arc<BrandTable>,
}

impl BrandResolver {
    /// Create a resolver over a table.
    pub fn new(table: BrandTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// The underlying table.
    pub fn table(&self) -> &BrandTable {
        &self.table
    }

    /// Resolve a hint.
    ///
    /// A missing or empty hint selects the default brand.
    ///
    /// # Errors
    ///
    /// A not-found error when an explicit hint matches no brand.
    pub fn resolve(&self, hint: Option<&str>) -> Result<LibraryBrand> {
        match hint.filter(|h| !h.is_empty()) {
            None => Ok(self.table.default_brand().clone()),
            Some(key) => self
                .table
                .get(key)
                .cloned()
                .ok_or_else(|| Error::not_found("brand", key)),
        }
    }

    /// Resolve a hint, substituting the default brand for unknown hints.
    pub fn resolve_or_default(&self, hint: Option<&str>) -> LibraryBrand {
        match self.resolve(hint) {
            Ok(brand) => brand,
            Err(err) => {
                log::warn!("{err}; using default brand '{}'", self.table.default_key());
                self.table.default_brand().clone()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
