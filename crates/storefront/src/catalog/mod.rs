//! Merch catalog access.
//!
//! Handlers talk to [`MerchCatalog`] and never to a concrete store:
//!
//! - [`crate::db::PgMerchCatalog`] when a database URL is configured
//! - [`InMemoryMerchCatalog`] otherwise (seeded with the launch merch)
//!
//! Either one is wrapped in a [`CachedMerchCatalog`] so the shop page does not
//! hit the store on every request.

mod cache;
mod memory;

use async_trait::async_trait;
use veilbound_core::{MerchProduct, MerchProductId, NewMerchProduct};

use crate::db::RepositoryError;

pub use cache::CachedMerchCatalog;
pub use memory::InMemoryMerchCatalog;

/// Storage for merch products.
///
/// Listings are ordered newest first.
#[async_trait]
pub trait MerchCatalog: Send + Sync {
    /// Active products, shown on the shop page.
    async fn list_active(&self) -> Result<Vec<MerchProduct>, RepositoryError>;

    /// Every product, for the admin API.
    async fn list_all(&self) -> Result<Vec<MerchProduct>, RepositoryError>;

    /// Look up one product, active or not.
    async fn get(&self, id: MerchProductId) -> Result<Option<MerchProduct>, RepositoryError>;

    /// Insert a new, active product.
    async fn create(&self, product: &NewMerchProduct) -> Result<MerchProduct, RepositoryError>;

    /// Replace a product's editable fields. `None` if it does not exist.
    async fn update(
        &self,
        id: MerchProductId,
        product: &NewMerchProduct,
    ) -> Result<Option<MerchProduct>, RepositoryError>;

    /// Delete a product. `false` if it did not exist.
    async fn delete(&self, id: MerchProductId) -> Result<bool, RepositoryError>;

    /// Show or hide a product on the shop page. `None` if it does not exist.
    async fn set_active(
        &self,
        id: MerchProductId,
        active: bool,
    ) -> Result<Option<MerchProduct>, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
