//! Tower middleware attaching the resolved brand to each request.
//!
//! `BrandLayer` reads the `lib` query parameter, resolves it against the
//! shared [`BrandResolver`], and inserts the [`LibraryBrand`] into request
//! extensions. Downstream handlers read it with
//! [`brand_from_parts`](crate::brand_from_parts) or the
//! [`CurrentBrand`](crate::CurrentBrand) extractor.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::Request;
use serde::{Deserialize, Serialize};
use tower::{Layer, Service};

use crate::brand::{BrandResolver, LibraryBrand};
use crate::context::brand_hint;
use crate::error::ErrorResponse;

/// What to do with a hint that names no configured brand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownBrandPolicy {
    /// Answer 404 without calling the inner service.
    #[default]
    Reject,
    /// Log a warning and continue with the default brand.
    FallbackToDefault,
}

/// Tower `Layer` that wraps services with brand resolution.
#[derive(Debug, Clone)]
pub struct BrandLayer {
    resolver: BrandResolver,
    policy: UnknownBrandPolicy,
}

impl BrandLayer {
    /// Create a layer that rejects unknown brands.
    pub fn new(resolver: BrandResolver) -> Self {
        Self {
            resolver,
            policy: UnknownBrandPolicy::default(),
        }
    }

    /// Set the unknown-brand policy.
    pub fn with_policy(mut self, policy: UnknownBrandPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<S> Layer<S> for BrandLayer {
    type Service = BrandService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BrandService {
            inner,
            resolver: self.resolver.clone(),
            policy: self.policy,
        }
    }
}

/// Tower `Service` that resolves the brand before forwarding requests.
#[derive(Debug, Clone)]
pub struct BrandService<S> {
    inner: S,
    resolver: BrandResolver,
    policy: UnknownBrandPolicy,
}

impl<S> BrandService<S> {
    fn brand_for(&self, req: &Request<Body>) -> katalog_core::Result<LibraryBrand> {
        let hint = brand_hint(req.uri().query());
        match self.policy {
            UnknownBrandPolicy::Reject => self.resolver.resolve(hint.as_deref()),
            UnknownBrandPolicy::FallbackToDefault => {
                Ok(self.resolver.resolve_or_default(hint.as_deref()))
            }
        }
    }
}

impl<S> Service<Request<Body>> for BrandService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let resolved = self.brand_for(&req);

        Box::pin(async move {
            match resolved {
                Ok(brand) => {
                    log::trace!("Request {} branded '{}'", req.uri().path(), brand.brand_id);
                    req.extensions_mut().insert(brand);
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Err(err) => {
                    log::warn!("Rejecting request for {}: {err}", req.uri().path());
                    Ok(ErrorResponse(err).into_response())
                }
            }
        })
    }
}
