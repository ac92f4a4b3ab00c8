//! Caching decorator for [`MerchCatalog`].
//!
//! Only the active listing is cached. Every write through the decorator
//! invalidates it, so admin edits show up on the next shop page load. Writes
//! made by other processes (e.g. `vb-cli seed`) show up after the TTL.
//!
//! A listing loaded while a write was in flight is dropped from the cache
//! again once the load finishes, so it cannot outlive the invalidation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};
use veilbound_core::{MerchProduct, MerchProductId, NewMerchProduct};

use super::MerchCatalog;
use crate::db::RepositoryError;

/// How long the active listing is served from cache.
pub const ACTIVE_LISTING_TTL: Duration = Duration::from_secs(60);

/// [`MerchCatalog`] with a cached active listing.
pub struct CachedMerchCatalog {
    inner: Arc<dyn MerchCatalog>,
    active: Cache<(), Arc<Vec<MerchProduct>>>,
    /// Bumped after every write, before the listing is invalidated.
    generation: AtomicU64,
}

impl CachedMerchCatalog {
    /// Wrap a catalog with the default TTL.
    #[must_use]
    pub fn new(inner: Arc<dyn MerchCatalog>) -> Self {
        Self::with_ttl(inner, ACTIVE_LISTING_TTL)
    }

    /// Wrap a catalog with a custom TTL.
    #[must_use]
    pub fn with_ttl(inner: Arc<dyn MerchCatalog>, ttl: Duration) -> Self {
        Self {
            inner,
            active: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            generation: AtomicU64::new(0),
        }
    }

    async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.active.invalidate(&()).await;
        debug!("Active merch listing invalidated");
    }
}

#[async_trait]
impl MerchCatalog for CachedMerchCatalog {
    #[instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<MerchProduct>, RepositoryError> {
        if let Some(cached) = self.active.get(&()).await {
            return Ok(cached.as_ref().clone());
        }
        let generation = self.generation.load(Ordering::SeqCst);
        let products = self.inner.list_active().await?;
        self.active.insert((), Arc::new(products.clone())).await;
        if self.generation.load(Ordering::SeqCst) == generation {
            debug!(count = products.len(), "Active merch listing cached");
        } else {
            // A write landed while loading; this listing may predate it.
            self.active.invalidate(&()).await;
            debug!("Active merch listing raced a write, not cached");
        }
        Ok(products)
    }

    async fn list_all(&self) -> Result<Vec<MerchProduct>, RepositoryError> {
        self.inner.list_all().await
    }

    async fn get(&self, id: MerchProductId) -> Result<Option<MerchProduct>, RepositoryError> {
        self.inner.get(id).await
    }

    async fn create(&self, product: &NewMerchProduct) -> Result<MerchProduct, RepositoryError> {
        let created = self.inner.create(product).await?;
        self.invalidate().await;
        Ok(created)
    }

    async fn update(
        &self,
        id: MerchProductId,
        product: &NewMerchProduct,
    ) -> Result<Option<MerchProduct>, RepositoryError> {
        let updated = self.inner.update(id, product).await?;
        self.invalidate().await;
        Ok(updated)
    }

    async fn delete(&self, id: MerchProductId) -> Result<bool, RepositoryError> {
        let deleted = self.inner.delete(id).await?;
        self.invalidate().await;
        Ok(deleted)
    }

    async fn set_active(
        &self,
        id: MerchProductId,
        active: bool,
    ) -> Result<Option<MerchProduct>, RepositoryError> {
        let updated = self.inner.set_active(id, active).await?;
        self.invalidate().await;
        Ok(updated)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }
}
