//! The NEOS discovery catalog configuration.
//!
//! Registration order below is the order users see in the facet bar, the
//! result list, the detail page and the search/sort menus.

use katalog_core::Result;

use crate::config::{GlobalQueryDefaults, SearchConfig, SearchConfigBuilder};
use crate::types::{
    DisplayFieldDef as Field, EngineParam, FacetFieldDef as Facet, FacetSort, LocalParam,
    SearchFieldDef, SortFieldDef as Sort,
};

/// Separator for multi-valued note fields.
const NOTE_SEPARATOR: &str = " -- ";

/// Build the catalog configuration with the given global defaults.
///
/// # Errors
///
/// Only if the definitions below are inconsistent, which the tests rule out.
pub fn catalog_config(defaults: GlobalQueryDefaults) -> Result<SearchConfig> {
    catalog_builder().defaults(defaults).build()
}

/// The catalog registrations, before global defaults are applied.
pub fn catalog_builder() -> SearchConfigBuilder {
    let builder = SearchConfig::builder();
    let builder = register_facets(builder);
    let builder = register_list_fields(builder);
    let builder = register_show_fields(builder);
    let builder = register_search_fields(builder);
    register_sorts(builder)
}

fn register_facets(b: SearchConfigBuilder) -> SearchConfigBuilder {
    b.register_facet(Facet::new("electronic_tesim", "Access").collapsed(false))
        .register_facet(Facet::new("institution_tesim", "Institution").sort(FacetSort::Index))
        .register_facet(Facet::new("location_tesim", "Library").sort(FacetSort::Index))
        .register_facet(Facet::new("lc_1letter_facet", "Call Number").limit(10))
        .register_facet(Facet::new("format", "Format").limit(10))
        .register_facet(Facet::new("pub_date", "Publication Year").range())
        .register_facet(Facet::new("author_display", "Author").limit(20))
        .register_facet(Facet::new("subject_topic_facet", "Subject").limit(20))
        .register_facet(Facet::new("language_facet", "Language").limit(10))
        .register_facet(Facet::new("subject_geo_facet", "Geographic Region").limit(10))
        .register_facet(Facet::new("subject_era_facet", "Historic Period").limit(10))
}

fn register_list_fields(b: SearchConfigBuilder) -> SearchConfigBuilder {
    [
        ("author_display", "Author"),
        ("edition_tesim", "Edition"),
        ("author_vern_display", "Author"),
        ("format", "Format"),
        ("language_note_tesim", "Language"),
        ("pub_date", "Publication Year"),
    ]
    .into_iter()
    .fold(b, |b, (key, label)| b.register_list_field(Field::new(key, label)))
}

fn register_show_fields(b: SearchConfigBuilder) -> SearchConfigBuilder {
    [
        ("title_addl_t", "Full/Alternate Title(s)"),
        ("alternate_display_tesim", "Original"),
        ("author_display", "Author"),
        ("author_addl_t", "Additional authors/performers"),
        ("author_vern_display", "Author"),
        ("format", "Format"),
        ("publisher_tesim", "Publisher"),
        ("published_display", "Published"),
        ("published_vern_display", "Published"),
        ("pub_date", "Year"),
        ("summary_holdings_tesim", "Summary of Holdings"),
        ("contains_tesim", "Other Physical Details"),
        ("moreinfo_tesim", "Additional Information"),
        ("isbn_tesim", "ISBN"),
        ("issn_tesim", "ISSN"),
        ("general_note_tesim", "General Note"),
        ("local_note_tesim", "Note"),
        ("contents_tesim", "Contents"),
        ("summary_tesim", "Summary"),
        ("target_audience_note_tesim", "Target Audience"),
        ("awards_note_tesim", "Awards"),
        ("bibliography_note_tesim", "Bibliography Note"),
        ("earlier_title_tesim", "Earlier title"),
        ("later_title_tesim", "Later title"),
        ("gmd_tesim", "Object type"),
        ("performers_tesim", "Performers"),
        ("title_series_t", "Series"),
        ("publisher_number_tesim", "Publisher/issue number"),
        ("arrangement_tesim", "Organization and Arrangement"),
        ("time_of_event_tesim", "Date and Time of Event"),
        ("issuing_body_tesim", "Issuing Body"),
        ("supplementary_note_tesim", "Supplement Note"),
        ("title_history_tesim", "Title History"),
        ("numbering_tesim", "Numbering System"),
        ("use_repro_tesim", "Use and Reproduction"),
        ("language_note_tesim", "Language Note"),
    ]
    .into_iter()
    .fold(b, |b, (key, label)| {
        let field = match key {
            "general_note_tesim" | "local_note_tesim" => {
                Field::new(key, label).separator(NOTE_SEPARATOR)
            }
            _ => Field::new(key, label),
        };
        b.register_show_field(field)
    })
}

/// A dismax aggregate field: its own spelling dictionary and `$<key>_qf/pf`.
fn fielded(key: &str) -> SearchFieldDef {
    SearchFieldDef::from_key(key)
        .param(EngineParam::SpellcheckDictionary, key)
        .local_param(LocalParam::Qf, format!("${key}_qf"))
        .local_param(LocalParam::Pf, format!("${key}_pf"))
}

fn register_search_fields(b: SearchConfigBuilder) -> SearchConfigBuilder {
    b.register_search_field(SearchFieldDef::new("all_fields", "All Fields"))
        .register_search_field(fielded("title"))
        .register_search_field(fielded("author"))
        .register_search_field(fielded("subject").handler("search"))
}

fn register_sorts(b: SearchConfigBuilder) -> SearchConfigBuilder {
    b.register_sort(Sort::new(
        "score desc, pub_date_sort desc, title_sort asc",
        "relevance",
    ))
    .register_sort(Sort::new("pub_date_sort desc, title_sort asc", "year"))
    .register_sort(Sort::new("author_sort asc, title_sort asc", "author"))
    .register_sort(Sort::new("title_sort asc, pub_date_sort desc", "title"))
}

// ============================================================================
// Tests
// ============================================================================
