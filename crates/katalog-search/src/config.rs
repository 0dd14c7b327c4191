//! Frozen search configuration and its builder.
//!
//! A [`SearchConfig`] is assembled once at startup through
//! [`SearchConfigBuilder`], validated by [`SearchConfigBuilder::build`], and
//! then shared read-only (typically behind an `Arc`) by every request.

use std::collections::BTreeMap;

use katalog_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::registry::{FieldRegistry, SortRegistry};
use crate::types::{
    EngineParam, FacetFieldDef, ListFieldDef, SearchFieldDef, ShowFieldDef, SortFieldDef,
};

/// Advanced-search form defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSearchConfig {
    /// URL segment of the advanced form.
    #[serde(default = "default_url_key")]
    pub url_key: String,

    /// Query parser used for advanced queries.
    #[serde(default = "default_query_parser")]
    pub query_parser: String,

    /// Extra request parameters sent with advanced-form queries.
    ///
    /// Keys must be recognised [`EngineParam`] names.
    #[serde(default)]
    pub form_params: BTreeMap<String, String>,
}

fn default_url_key() -> String {
    "advanced".to_string()
}

fn default_query_parser() -> String {
    "dismax".to_string()
}

impl Default for AdvancedSearchConfig {
    fn default() -> Self {
        Self {
            url_key: default_url_key(),
            query_parser: default_query_parser(),
            form_params: BTreeMap::new(),
        }
    }
}

impl AdvancedSearchConfig {
    /// Form parameters with typed keys.
    ///
    /// # Errors
    ///
    /// A configuration error naming the first unrecognised key.
    pub fn typed_form_params(&self) -> Result<BTreeMap<EngineParam, String>> {
        self.form_params
            .iter()
            .map(|(k, v)| Ok((k.parse::<EngineParam>()?, v.clone())))
            .collect()
    }
}

/// Global defaults applied to every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalQueryDefaults {
    /// Results per page (`rows`).
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Above this many hits no spelling suggestion is offered.
    #[serde(default = "default_spell_max")]
    pub spell_suggest_max_results: usize,

    /// Enable the autocomplete suggester.
    #[serde(default = "default_true")]
    pub autocomplete_enabled: bool,

    /// Path of the suggester endpoint.
    #[serde(default = "default_autocomplete_path")]
    pub autocomplete_path: String,

    /// Advanced-search defaults.
    #[serde(default, rename = "advanced")]
    pub advanced_search: AdvancedSearchConfig,
}

fn default_page_size() -> usize {
    10
}

fn default_spell_max() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_autocomplete_path() -> String {
    "suggest".to_string()
}

impl Default for GlobalQueryDefaults {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            spell_suggest_max_results: default_spell_max(),
            autocomplete_enabled: default_true(),
            autocomplete_path: default_autocomplete_path(),
            advanced_search: AdvancedSearchConfig::default(),
        }
    }
}

/// Which record fields drive result-list rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexViewConfig {
    /// Field used as the result title.
    pub title_field: String,
    /// Field naming the document type.
    pub display_type_field: String,
}

impl Default for IndexViewConfig {
    fn default() -> Self {
        Self {
            title_field: "title_display".to_string(),
            display_type_field: "format".to_string(),
        }
    }
}

/// Immutable, validated search configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchConfig {
    fields: FieldRegistry,
    sorts: SortRegistry,
    defaults: GlobalQueryDefaults,
    index_view: IndexViewConfig,
}

impl SearchConfig {
    /// Start an empty builder.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Field registry.
    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Sort registry.
    pub fn sorts(&self) -> &SortRegistry {
        &self.sorts
    }

    /// Global query defaults.
    pub fn defaults(&self) -> &GlobalQueryDefaults {
        &self.defaults
    }

    /// List-view field roles.
    pub fn index_view(&self) -> &IndexViewConfig {
        &self.index_view
    }

    /// Facets in display order.
    pub fn facets(&self) -> &[FacetFieldDef] {
        self.fields.facets()
    }

    /// Result-list fields in display order.
    pub fn list_fields(&self) -> &[ListFieldDef] {
        self.fields.list_fields()
    }

    /// Detail-page fields in display order.
    pub fn show_fields(&self) -> &[ShowFieldDef] {
        self.fields.show_fields()
    }

    /// Search fields in menu order.
    pub fn search_fields(&self) -> &[SearchFieldDef] {
        self.fields.search_fields()
    }

    /// Sorts in menu order.
    pub fn sort_fields(&self) -> &[SortFieldDef] {
        self.sorts.sorts()
    }

    /// The default ordering expression, if any sort is registered.
    pub fn default_sort(&self) -> Option<&SortFieldDef> {
        self.sorts.default_sort()
    }

    /// Whether a "did you mean" suggestion should be offered for `total_hits`.
    pub fn offers_spelling_suggestion(&self, total_hits: usize) -> bool {
        total_hits <= self.defaults.spell_suggest_max_results
    }

    /// Suggester path when autocomplete is enabled.
    pub fn autocomplete_path(&self) -> Option<&str> {
        self.defaults
            .autocomplete_enabled
            .then_some(self.defaults.autocomplete_path.as_str())
    }
}

/// Ordered registration of catalog configuration.
///
/// Each `register_*` call appends; nothing is reordered. Validation happens
/// in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    fields: FieldRegistry,
    sorts: SortRegistry,
    defaults: GlobalQueryDefaults,
    index_view: IndexViewConfig,
}

impl SearchConfigBuilder {
    /// Append a facet.
    pub fn register_facet(mut self, def: FacetFieldDef) -> Self {
        self.fields.push_facet(def);
        self
    }

    /// Append a result-list field.
    pub fn register_list_field(mut self, def: ListFieldDef) -> Self {
        self.fields.push_list_field(def);
        self
    }

    /// Append a detail-page field.
    pub fn register_show_field(mut self, def: ShowFieldDef) -> Self {
        self.fields.push_show_field(def);
        self
    }

    /// Append a search field.
    pub fn register_search_field(mut self, def: SearchFieldDef) -> Self {
        self.fields.push_search_field(def);
        self
    }

    /// Append a sort; the first registered sort is the default.
    pub fn register_sort(mut self, def: SortFieldDef) -> Self {
        self.sorts.push(def);
        self
    }

    /// Replace the global query defaults.
    pub fn defaults(mut self, defaults: GlobalQueryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the list-view field roles.
    pub fn index_view(mut self, index_view: IndexViewConfig) -> Self {
        self.index_view = index_view;
        self
    }

    /// Validate and freeze.
    ///
    /// # Errors
    ///
    /// Configuration errors for duplicate search-field keys, duplicate
    /// facets, malformed sort expressions, a zero page size, or unknown
    /// advanced-search parameters.
    pub fn build(self) -> Result<SearchConfig> {
        self.fields.validate()?;
        self.sorts.validate()?;

        if self.defaults.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        self.defaults.advanced_search.typed_form_params()?;

        log::debug!(
            "Search configuration built: {} facets, {} list fields, {} show fields, {} search fields, {} sorts",
            self.fields.facets().len(),
            self.fields.list_fields().len(),
            self.fields.show_fields().len(),
            self.fields.search_fields().len(),
            self.sorts.sorts().len()
        );

        Ok(SearchConfig {
            fields: self.fields,
            sorts: self.sorts,
            defaults: self.defaults,
            index_view: self.index_view,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
