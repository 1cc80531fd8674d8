//! Client side of the cat integration API.
//!
//! [`CatSource`] is the seam the sync service depends on; [`ApiClient`] is the
//! HTTP implementation used in production.

mod client;
mod error;

use std::future::Future;

use crate::models::RemoteCat;

pub use client::{ApiClient, ClientConfigError};
pub use error::ApiError;

/// Anything that can list a tenant's cats.
///
/// Implementations must fail with an [`ApiError`] rather than return partial
/// data, and must not retry internally.
pub trait CatSource: Send + Sync {
    fn fetch_cats(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = Result<Vec<RemoteCat>, ApiError>> + Send;
}
