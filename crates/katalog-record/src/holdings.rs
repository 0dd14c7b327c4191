//! Holdings service abstraction.
//!
//! Holdings come from an external availability service keyed by record id.
//! The service answers in one of two modes: `items` (physical or electronic
//! copies with a location and availability flags) or `links` (URL-like
//! entries for online access).

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use katalog_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One copy of a record.
///
/// `location` is optional here so that malformed service output can be
/// represented and reported; enrichment requires it on every entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingEntry {
    /// Shelving location; the holdings sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Whether a hold may be placed.
    #[serde(default)]
    pub holdable: bool,

    /// Whether the copy may be booked.
    #[serde(default)]
    pub bookable: bool,

    /// Remaining service attributes, passed through untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl HoldingEntry {
    /// An entry at the given location with both flags false.
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    /// Set the holdable flag.
    pub fn holdable(mut self, holdable: bool) -> Self {
        self.holdable = holdable;
        self
    }

    /// Set the bookable flag.
    pub fn bookable(mut self, bookable: bool) -> Self {
        self.bookable = bookable;
        self
    }

    /// Add a passthrough attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// An online-access entry returned in `links` mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingLink {
    /// Target URL.
    pub url: String,

    /// Link text, if the service supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Remaining service attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HoldingLink {
    /// A link with no label.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: None,
            extra: Map::new(),
        }
    }
}

/// Which view of a record's holdings to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingsMode {
    /// Copies with location and availability.
    Items,
    /// Online-access URLs.
    Links,
}

impl HoldingsMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldingsMode::Items => "items",
            HoldingsMode::Links => "links",
        }
    }
}

impl std::fmt::Display for HoldingsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A holdings service answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Holdings {
    /// Answer to an `items` request.
    Items(Vec<HoldingEntry>),
    /// Answer to a `links` request.
    Links(Vec<HoldingLink>),
}

impl Holdings {
    /// The mode this answer belongs to.
    pub fn mode(&self) -> HoldingsMode {
        match self {
            Holdings::Items(_) => HoldingsMode::Items,
            Holdings::Links(_) => HoldingsMode::Links,
        }
    }
}

/// External holdings/availability service.
///
/// An empty answer is valid. Failures are returned as upstream errors and
/// are not retried here.
#[async_trait]
pub trait HoldingsService: Send + Sync {
    /// Fetch holdings for a record in the given mode.
    async fn fetch(&self, record_id: &str, mode: HoldingsMode) -> Result<Holdings>;

    /// Service name for diagnostics.
    fn name(&self) -> &str {
        "holdings"
    }

    /// Fetch `items` holdings.
    ///
    /// # Errors
    ///
    /// Propagates service failures; an answer in the wrong mode is an
    /// upstream error.
    async fn items(&self, record_id: &str) -> Result<Vec<HoldingEntry>> {
        match self.fetch(record_id, HoldingsMode::Items).await? {
            Holdings::Items(items) => Ok(items),
            other => Err(mode_mismatch(self.name(), HoldingsMode::Items, other.mode())),
        }
    }

    /// Fetch `links` holdings.
    ///
    /// # Errors
    ///
    /// As for [`items`](Self::items).
    async fn links(&self, record_id: &str) -> Result<Vec<HoldingLink>> {
        match self.fetch(record_id, HoldingsMode::Links).await? {
            Holdings::Links(links) => Ok(links),
            other => Err(mode_mismatch(self.name(), HoldingsMode::Links, other.mode())),
        }
    }
}

fn mode_mismatch(service: &str, expected: HoldingsMode, got: HoldingsMode) -> Error {
    Error::upstream(
        service.to_string(),
        format!("requested {expected} holdings, service answered with {got}"),
    )
}

// ============================================================================
// StaticHoldings
// ============================================================================

/// Holdings answered from in-memory tables.
///
/// Records without an entry get an empty answer. Records marked with
/// [`failing_for`](Self::failing_for) answer with an upstream error.
#[derive(Debug, Clone, Default)]
pub struct StaticHoldings {
    items: HashMap<String, Vec<HoldingEntry>>,
    links: HashMap<String, Vec<HoldingLink>>,
    failing: HashSet<String>,
}

impl StaticHoldings {
    /// An empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `items` holdings for a record.
    pub fn with_items(mut self, record_id: impl Into<String>, items: Vec<HoldingEntry>) -> Self {
        self.items.insert(record_id.into(), items);
        self
    }

    /// Register `links` holdings for a record.
    pub fn with_links(mut self, record_id: impl Into<String>, links: Vec<HoldingLink>) -> Self {
        self.links.insert(record_id.into(), links);
        self
    }

    /// Make every request for a record fail.
    pub fn failing_for(mut self, record_id: impl Into<String>) -> Self {
        self.failing.insert(record_id.into());
        self
    }

    /// Load `items` holdings from a JSON object keyed by record id.
    ///
    /// # Errors
    ///
    /// A serialization error if the input does not have that shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let items: HashMap<String, Vec<HoldingEntry>> = serde_json::from_str(json)?;
        Ok(Self {
            items,
            ..Self::default()
        })
    }
}

#[async_trait]
impl HoldingsService for StaticHoldings {
    async fn fetch(&self, record_id: &str, mode: HoldingsMode) -> Result<Holdings> {
        if self.failing.contains(record_id) {
            return Err(Error::upstream(
                self.name().to_string(),
                format!("{mode} lookup failed for record {record_id}"),
            ));
        }

        Ok(match mode {
            HoldingsMode::Items => {
                Holdings::Items(self.items.get(record_id).cloned().unwrap_or_default())
            }
            HoldingsMode::Links => {
                Holdings::Links(self.links.get(record_id).cloned().unwrap_or_default())
            }
        })
    }

    fn name(&self) -> &str {
        "static-holdings"
    }
}
