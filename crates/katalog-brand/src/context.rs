//! Request-scoped brand context and extraction helpers.
//!
//! The resolved brand lives in the request's extensions, so concurrent
//! requests never observe each other's brand.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

use crate::brand::{BRAND_PARAM, LibraryBrand};

/// Extract the brand hint from a raw query string.
///
/// Returns the first `lib` value, percent-decoded. An empty value is
/// returned as-is and later treated as "no hint".
pub fn brand_hint(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == BRAND_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Extract the resolved `LibraryBrand` from HTTP request `Parts`, if present.
pub fn brand_from_parts(parts: &Parts) -> Option<&LibraryBrand> {
    parts.extensions.get::<LibraryBrand>()
}

/// Axum extractor for the brand resolved by [`BrandLayer`](crate::BrandLayer).
#[derive(Debug, Clone)]
pub struct CurrentBrand(pub LibraryBrand);

impl<S> FromRequestParts<S> for CurrentBrand
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        brand_from_parts(parts)
            .cloned()
            .map(CurrentBrand)
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "brand context missing: BrandLayer not installed",
            ))
    }
}
