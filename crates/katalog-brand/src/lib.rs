//! Library branding for Katalog.
//!
//! Provides:
//! - [`LibraryBrand`], [`BrandTable`], [`BrandResolver`]: the brand table and hint resolution
//! - [`BrandLayer`] / [`BrandService`]: Tower middleware attaching the brand to each request
//! - [`brand_from_parts`] / [`CurrentBrand`]: reading the brand back in handlers
//! - [`ErrorResponse`]: JSON rendering of catalog errors

mod brand;
mod context;
mod error;
mod middleware;

pub use brand::{
    BRAND_PARAM, BrandEntry, BrandResolver, BrandTable, BrandTableConfig, DEFAULT_BRAND,
    LibraryBrand,
};
pub use context::{CurrentBrand, brand_from_parts, brand_hint};
pub use error::{ErrorResponse, status_for};
pub use middleware::{BrandLayer, BrandService, UnknownBrandPolicy};
