//! Per-record display enrichment.
//!
//! [`RecordEnricher::enrich`] derives everything the detail view needs from
//! a raw record and its holdings:
//!
//! - title, with `"Untitled document"` when absent or blank
//! - holdings sorted by lower-cased location, **descending**, stable on ties
//! - holdable/bookable taken from the first sorted entry
//! - full-text URLs, subject chains and additional authors, each absent
//!   (not empty) when the record lacks the field
//!
//! The descending location order and first-entry flags are part of the
//! detail page contract and are kept as-is.

use katalog_core::{Error, RawRecord, Result};
use serde::{Deserialize, Serialize};

use crate::holdings::HoldingEntry;

/// Placeholder title for records without one.
pub const UNTITLED: &str = "Untitled document";

/// Delimiter between sub-topics in a subject heading.
pub const SUBJECT_DELIMITER: &str = "--";

fn default_title_field() -> String {
    "title_display".to_string()
}

fn default_fulltext_field() -> String {
    "url_fulltext_display".to_string()
}

fn default_subject_field() -> String {
    "subject_t".to_string()
}

fn default_additional_author_field() -> String {
    "author_addl_t".to_string()
}

/// Index field keys read by the enricher (`[record]` config section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    /// Title field.
    #[serde(default = "default_title_field")]
    pub title: String,

    /// Full-text URL indicator field.
    #[serde(default = "default_fulltext_field")]
    pub fulltext_url: String,

    /// Subject headings field.
    #[serde(default = "default_subject_field")]
    pub subject: String,

    /// Additional authors field.
    #[serde(default = "default_additional_author_field")]
    pub additional_author: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            title: default_title_field(),
            fulltext_url: default_fulltext_field(),
            subject: default_subject_field(),
            additional_author: default_additional_author_field(),
        }
    }
}

/// Display data derived for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    /// Record id, when the record carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Title; never empty.
    pub title: String,

    /// Holdings in display order.
    pub holdings: Vec<HoldingEntry>,

    /// Holdable flag of the first displayed holding.
    pub holdable: bool,

    /// Bookable flag of the first displayed holding.
    pub bookable: bool,

    /// Online-access URLs; `None` when the record has no full text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulltext_urls: Option<Vec<String>>,

    /// Each subject heading split into its sub-topic chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<Vec<String>>>,

    /// Additional authors as stored in the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_authors: Option<Vec<String>>,

    /// Why holdings were dropped, when the detail flow had to omit them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holdings_omitted: Option<String>,
}

/// Derives [`EnrichedRecord`]s. Holds only field names; no per-record state.
#[derive(Debug, Clone, Default)]
pub struct RecordEnricher {
    fields: RecordFields,
}

impl RecordEnricher {
    /// Create an enricher reading the given fields.
    pub fn new(fields: RecordFields) -> Self {
        Self { fields }
    }

    /// The fields this enricher reads.
    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    /// Enrich a record with its holdings.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedHolding`] if any holdings entry has no location.
    /// Missing optional record fields never fail.
    pub fn enrich(&self, record: &RawRecord, holdings: Vec<HoldingEntry>) -> Result<EnrichedRecord> {
        let holdings = sort_holdings(holdings)?;
        let (holdable, bookable) = holdings
            .first()
            .map(|first| (first.holdable, first.bookable))
            .unwrap_or((false, false));

        let title = record
            .first_str(&self.fields.title)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED)
            .to_string();

        let fulltext_urls = record
            .strings(&self.fields.fulltext_url)
            .map(|urls| urls.into_iter().filter(|u| !u.is_empty()).collect::<Vec<_>>())
            .filter(|urls| !urls.is_empty());

        let subjects = record
            .strings(&self.fields.subject)
            .map(|subjects| subjects.iter().map(|s| split_subject(s)).collect());

        Ok(EnrichedRecord {
            id: record.id().map(str::to_string),
            title,
            holdings,
            holdable,
            bookable,
            fulltext_urls,
            subjects,
            additional_authors: record.strings(&self.fields.additional_author),
            holdings_omitted: None,
        })
    }
}

/// Sort holdings by lower-cased location, descending.
///
/// The sort is stable: entries with equal keys keep their input order.
///
/// # Errors
///
/// [`Error::MalformedHolding`] naming the first entry without a location.
pub fn sort_holdings(holdings: Vec<HoldingEntry>) -> Result<Vec<HoldingEntry>> {
    let mut keyed = holdings
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry.location.as_deref() {
            Some(location) => Ok((location.to_lowercase(), entry)),
            None => Err(Error::MalformedHolding { index }),
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
}

/// Split a subject heading into its sub-topics.
///
/// Trailing empty segments are dropped, so `"Fiction--"` yields
/// `["Fiction"]` and an empty heading yields no sub-topics.
pub fn split_subject(subject: &str) -> Vec<String> {
    let mut parts: Vec<String> = subject.split(SUBJECT_DELIMITER).map(str::to_string).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

// ============================================================================
// Tests
// ============================================================================
