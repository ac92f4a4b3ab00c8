//! Process-local merch catalog.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use veilbound_core::catalog::default_merch;
use veilbound_core::{MerchProduct, MerchProductId, NewMerchProduct};

use super::MerchCatalog;
use crate::db::RepositoryError;

/// Merch catalog held in memory. Changes are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryMerchCatalog {
    // Insertion order; listings walk it backwards.
    products: RwLock<Vec<MerchProduct>>,
}

impl InMemoryMerchCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the launch merch line.
    #[must_use]
    pub fn seeded() -> Self {
        let products = default_merch().iter().map(materialize).collect();
        Self {
            products: RwLock::new(products),
        }
    }
}

fn materialize(product: &NewMerchProduct) -> MerchProduct {
    MerchProduct {
        id: MerchProductId::generate(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price,
        image_url: product.image_url.clone(),
        colors: product.colors.clone(),
        sizes: product.sizes.clone(),
        is_active: true,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl MerchCatalog for InMemoryMerchCatalog {
    async fn list_active(&self) -> Result<Vec<MerchProduct>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().rev().filter(|p| p.is_active).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<MerchProduct>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().rev().cloned().collect())
    }

    async fn get(&self, id: MerchProductId) -> Result<Option<MerchProduct>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, product: &NewMerchProduct) -> Result<MerchProduct, RepositoryError> {
        let created = materialize(product);
        self.products.write().await.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: MerchProductId,
        product: &NewMerchProduct,
    ) -> Result<Option<MerchProduct>, RepositoryError> {
        let mut products = self.products.write().await;
        let Some(existing) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        existing.name.clone_from(&product.name);
        existing.description.clone_from(&product.description);
        existing.price = product.price;
        existing.image_url.clone_from(&product.image_url);
        existing.colors.clone_from(&product.colors);
        existing.sizes.clone_from(&product.sizes);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: MerchProductId) -> Result<bool, RepositoryError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }

    async fn set_active(
        &self,
        id: MerchProductId,
        active: bool,
    ) -> Result<Option<MerchProduct>, RepositoryError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|existing| {
            existing.is_active = active;
            existing.clone()
        }))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
