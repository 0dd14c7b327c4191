//! Ordered registries of catalog fields and sorts.
//!
//! Registration order is display order. Nothing is sorted or deduplicated on
//! insert; uniqueness rules are checked once, by [`FieldRegistry::validate`],
//! when the configuration is built.

use std::collections::HashSet;

use katalog_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::types::{FacetFieldDef, ListFieldDef, SearchFieldDef, ShowFieldDef, SortFieldDef};

/// Facets, list fields, show fields and search fields, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRegistry {
    facets: Vec<FacetFieldDef>,
    list_fields: Vec<ListFieldDef>,
    show_fields: Vec<ShowFieldDef>,
    search_fields: Vec<SearchFieldDef>,
}

impl FieldRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a facet.
    pub fn push_facet(&mut self, def: FacetFieldDef) {
        self.facets.push(def);
    }

    /// Append a result-list field.
    pub fn push_list_field(&mut self, def: ListFieldDef) {
        self.list_fields.push(def);
    }

    /// Append a detail-page field.
    pub fn push_show_field(&mut self, def: ShowFieldDef) {
        self.show_fields.push(def);
    }

    /// Append a search field.
    pub fn push_search_field(&mut self, def: SearchFieldDef) {
        self.search_fields.push(def);
    }

    /// Facets in display order.
    pub fn facets(&self) -> &[FacetFieldDef] {
        &self.facets
    }

    /// Result-list fields in display order.
    pub fn list_fields(&self) -> &[ListFieldDef] {
        &self.list_fields
    }

    /// Detail-page fields in display order.
    pub fn show_fields(&self) -> &[ShowFieldDef] {
        &self.show_fields
    }

    /// Search fields in menu order.
    pub fn search_fields(&self) -> &[SearchFieldDef] {
        &self.search_fields
    }

    /// Look up a facet by index field.
    pub fn facet(&self, field_key: &str) -> Option<&FacetFieldDef> {
        self.facets.iter().find(|f| f.field_key == field_key)
    }

    /// Look up a search field by URL key.
    pub fn search_field(&self, key: &str) -> Option<&SearchFieldDef> {
        self.search_fields.iter().find(|f| f.key == key)
    }

    /// The search field used when a request names none.
    pub fn default_search_field(&self) -> Option<&SearchFieldDef> {
        self.search_fields.first()
    }

    /// Check uniqueness of facet fields and search-field keys.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateFacetField`] or [`Error::DuplicateSearchField`] on
    /// the first collision found.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for facet in &self.facets {
            if !seen.insert(facet.field_key.as_str()) {
                return Err(Error::DuplicateFacetField {
                    field: facet.field_key.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for field in &self.search_fields {
            if !seen.insert(field.key.as_str()) {
                return Err(Error::DuplicateSearchField {
                    key: field.key.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Named sort orders; the first one is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortRegistry {
    sorts: Vec<SortFieldDef>,
}

impl SortRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sort.
    pub fn push(&mut self, def: SortFieldDef) {
        self.sorts.push(def);
    }

    /// Sorts in menu order.
    pub fn sorts(&self) -> &[SortFieldDef] {
        &self.sorts
    }

    /// First registered sort.
    pub fn default_sort(&self) -> Option<&SortFieldDef> {
        self.sorts.first()
    }

    /// Find a sort by its expression or its label.
    pub fn find(&self, key: &str) -> Option<&SortFieldDef> {
        self.sorts
            .iter()
            .find(|s| s.sort_key == key)
            .or_else(|| self.sorts.iter().find(|s| s.label == key))
    }

    /// Parse every expression.
    ///
    /// # Errors
    ///
    /// The first malformed expression, as a configuration error.
    pub fn validate(&self) -> Result<()> {
        for sort in &self.sorts {
            sort.clauses()?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use katalog_core::ErrorKind;

    #[test]
    fn test_registration_order_is_display_order() {
        let mut registry = FieldRegistry::new();
        registry.push_facet(FacetFieldDef::new("language_facet", "Language"));
        registry.push_facet(FacetFieldDef::new("format", "Format"));
        registry.push_facet(FacetFieldDef::new("author_display", "Author"));

        let keys: Vec<&str> = registry
            .facets()
            .iter()
            .map(|f| f.field_key.as_str())
            .collect();
        assert_eq!(keys, vec!["language_facet", "format", "author_display"]);
    }

    #[test]
    fn test_show_fields_allow_repeated_keys() {
        let mut registry = FieldRegistry::new();
        registry.push_show_field(ShowFieldDef::new("author_display", "Author"));
        registry.push_show_field(ShowFieldDef::new("author_display", "Author (again)"));
        assert_eq!(registry.show_fields().len(), 2);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_duplicate_search_field_rejected() {
        let mut registry = FieldRegistry::new();
        registry.push_search_field(SearchFieldDef::from_key("title"));
        registry.push_search_field(SearchFieldDef::new("title", "Title (alt)"));

        let err = registry.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(matches!(err, Error::DuplicateSearchField { ref key } if key == "title"));
    }

    #[test]
    fn test_duplicate_facet_rejected() {
        let mut registry = FieldRegistry::new();
        registry.push_facet(FacetFieldDef::new("format", "Format"));
        registry.push_facet(FacetFieldDef::new("format", "Type"));
        assert!(matches!(
            registry.validate(),
            Err(Error::DuplicateFacetField { .. })
        ));
    }

    #[test]
    fn test_search_field_lookup() {
        let mut registry = FieldRegistry::new();
        registry.push_search_field(SearchFieldDef::from_key("all_fields"));
        registry.push_search_field(SearchFieldDef::from_key("author"));

        assert_eq!(registry.default_search_field().unwrap().key, "all_fields");
        assert_eq!(registry.search_field("author").unwrap().label, "Author");
        assert!(registry.search_field("isbn").is_none());
    }

    #[test]
    fn test_sort_default_and_find() {
        let mut sorts = SortRegistry::new();
        sorts.push(SortFieldDef::new("score desc, title_sort asc", "relevance"));
        sorts.push(SortFieldDef::new("title_sort asc", "title"));

        assert_eq!(sorts.default_sort().unwrap().label, "relevance");
        assert_eq!(sorts.find("title").unwrap().sort_key, "title_sort asc");
        assert_eq!(sorts.find("title_sort asc").unwrap().label, "title");
        assert!(sorts.find("year").is_none());
    }

    #[test]
    fn test_sort_validate() {
        let mut sorts = SortRegistry::new();
        sorts.push(SortFieldDef::new("title_sort sideways", "title"));
        assert!(sorts.validate().unwrap_err().is_configuration());
    }
}
