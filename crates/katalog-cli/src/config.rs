//! Configuration file for the `katalog` binary.
//!
//! The file is TOML. Its location is resolved from, in order:
//!
//! 1. `--config <path>`
//! 2. `$KATALOG_CONFIG`
//! 3. `<config dir>/katalog/config.toml` (via `dirs::config_dir()`)
//!
//! Every section is optional and falls back to the catalog defaults.

use std::path::{Path, PathBuf};

use katalog_brand::{BrandTable, BrandTableConfig, UnknownBrandPolicy};
use katalog_core::{Error, Result};
use katalog_record::RecordFields;
use katalog_search::{GlobalQueryDefaults, SearchConfig, catalog_config};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "KATALOG_CONFIG";

/// Project name used for the config directory.
pub const PROJECT_NAME: &str = "katalog";

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Handling of unknown `lib` hints.
    #[serde(default)]
    pub unknown_brand: UnknownBrandPolicy,

    /// JSON array of records served by the in-memory index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<PathBuf>,

    /// JSON object of holdings keyed by record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdings: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            unknown_brand: UnknownBrandPolicy::default(),
            records: None,
            holdings: None,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KatalogConfig {
    /// `[search]`: global query defaults.
    #[serde(default)]
    pub search: GlobalQueryDefaults,

    /// `[brands]`: the library brand table.
    #[serde(default)]
    pub brands: BrandTableConfig,

    /// `[record]`: fields read by the record enricher.
    #[serde(default)]
    pub record: RecordFields,

    /// `[server]`: the JSON server.
    #[serde(default)]
    pub server: ServerConfig,
}

impl KatalogConfig {
    /// Resolve the config file path.
    ///
    /// Returns `None` only when no explicit path or env var is given and the
    /// platform has no config directory.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// `<config dir>/katalog/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist. A missing file at the env or
    /// default location yields the defaults.
    ///
    /// # Errors
    ///
    /// I/O errors reading the file, or TOML errors parsing it.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) if explicit.is_some() => Err(Error::config(format!(
                "Config file does not exist at {}",
                path.display()
            ))),
            Some(path) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load).
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render as pretty TOML.
    ///
    /// # Errors
    ///
    /// A configuration error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Build the catalog search configuration with this file's defaults.
    ///
    /// # Errors
    ///
    /// Configuration errors from [`SearchConfig`] validation.
    pub fn search_config(&self) -> Result<SearchConfig> {
        catalog_config(self.search.clone())
    }

    /// Build the brand table.
    ///
    /// # Errors
    ///
    /// A configuration error if the default brand has no entry.
    pub fn brand_table(&self) -> Result<BrandTable> {
        BrandTable::from_config(&self.brands)
    }

    /// Validate everything that is checked at startup.
    ///
    /// # Errors
    ///
    /// The first configuration error found.
    pub fn validate(&self) -> Result<()> {
        self.search_config()?;
        self.brand_table()?;
        Ok(())
    }
}
