//! JSON routes over [`CatalogService`].
//!
//! ```text
//! GET /catalog?q=...&search_field=...&sort=...&page=...&per_page=...
//!             &f[<facet>][]=<value>&range[<facet>][begin]=...&range[<facet>][end]=...
//!             &lib=<brand>
//! GET /catalog/{id}?lib=<brand>
//! ```
//!
//! The `lib` parameter is consumed by [`BrandLayer`]; handlers read the
//! resolved brand with [`CurrentBrand`].

use axum::Json;
use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::routing::get;
use katalog_brand::{BrandLayer, BrandResolver, CurrentBrand, ErrorResponse, UnknownBrandPolicy};
use katalog_search::SearchRequest;

use crate::service::{CatalogService, DetailView, ListView};

/// Build the catalog router with brand resolution applied to every route.
pub fn router(service: CatalogService, resolver: BrandResolver, policy: UnknownBrandPolicy) -> Router {
    Router::new()
        .route("/catalog", get(list))
        .route("/catalog/{id}", get(show))
        .with_state(service)
        .layer(BrandLayer::new(resolver).with_policy(policy))
}

async fn list(
    State(service): State<CatalogService>,
    CurrentBrand(brand): CurrentBrand,
    RawQuery(query): RawQuery,
) -> Result<Json<ListView>, ErrorResponse> {
    let request = search_request_from_query(query.as_deref());
    Ok(Json(service.index(brand, &request).await?))
}

async fn show(
    State(service): State<CatalogService>,
    CurrentBrand(brand): CurrentBrand,
    Path(id): Path<String>,
) -> Result<Json<DetailView>, ErrorResponse> {
    Ok(Json(service.show(brand, &id).await?))
}

/// Parse list-view request parameters.
///
/// Unrecognised parameters are ignored. Blank numbers and bounds count as
/// absent.
pub fn search_request_from_query(query: Option<&str>) -> SearchRequest {
    let mut request = SearchRequest::default();
    let Some(query) = query else {
        return request;
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "q" => request.q = value,
            "search_field" => request.search_field = Some(value).filter(|v| !v.is_empty()),
            "sort" => request.sort = Some(value).filter(|v| !v.is_empty()),
            "page" => request.page = value.parse().ok(),
            "per_page" => request.per_page = value.parse().ok(),
            "search_type" => request.advanced = value == "advanced",
            other => {
                if let Some(field) = facet_key(other) {
                    request
                        .facet_filters
                        .entry(field.to_string())
                        .or_default()
                        .push(value);
                } else if let Some((field, bound)) = range_key(other) {
                    let bounds = request.range_filters.entry(field.to_string()).or_default();
                    let value = Some(value).filter(|v| !v.is_empty());
                    match bound {
                        "begin" => bounds.begin = value,
                        _ => bounds.end = value,
                    }
                }
            }
        }
    }
    request
}

/// `f[<field>][]` or `f[<field>]`.
fn facet_key(key: &str) -> Option<&str> {
    let rest = key.strip_prefix("f[")?;
    let field = rest.strip_suffix("][]").or_else(|| rest.strip_suffix(']'))?;
    (!field.is_empty()).then_some(field)
}

/// `range[<field>][begin]` or `range[<field>][end]`.
fn range_key(key: &str) -> Option<(&str, &str)> {
    let rest = key.strip_prefix("range[")?.strip_suffix(']')?;
    let (field, bound) = rest.split_once("][")?;
    matches!(bound, "begin" | "end").then_some((field, bound))
}
