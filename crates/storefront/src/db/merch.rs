//! Merch catalog backed by the `merch_products` table.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use veilbound_core::{MerchProduct, MerchProductId, NewMerchProduct};

use super::RepositoryError;
use crate::catalog::MerchCatalog;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image_url, colors, sizes, is_active, created_at";

/// `PostgreSQL` merch catalog.
#[derive(Debug, Clone)]
pub struct PgMerchCatalog {
    pool: PgPool,
}

impl PgMerchCatalog {
    /// Create a catalog over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether a product with this exact name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, RepositoryError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM merch_products WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }
}

#[async_trait]
impl MerchCatalog for PgMerchCatalog {
    #[instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<MerchProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, MerchProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM merch_products \
             WHERE is_active ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<MerchProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, MerchProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM merch_products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: MerchProductId) -> Result<Option<MerchProduct>, RepositoryError> {
        let product = sqlx::query_as::<_, MerchProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM merch_products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: &NewMerchProduct) -> Result<MerchProduct, RepositoryError> {
        let created = sqlx::query_as::<_, MerchProduct>(&format!(
            r"
            INSERT INTO merch_products
                (id, name, description, price, image_url, colors, sizes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(MerchProductId::generate())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(&product.colors)
        .bind(&product.sizes)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %created.id, "Created merch product");
        Ok(created)
    }

    #[instrument(skip(self, product), fields(id = %id))]
    async fn update(
        &self,
        id: MerchProductId,
        product: &NewMerchProduct,
    ) -> Result<Option<MerchProduct>, RepositoryError> {
        let updated = sqlx::query_as::<_, MerchProduct>(&format!(
            r"
            UPDATE merch_products
            SET name = $2, description = $3, price = $4, image_url = $5,
                colors = $6, sizes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(&product.colors)
        .bind(&product.sizes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: MerchProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM merch_products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn set_active(
        &self,
        id: MerchProductId,
        active: bool,
    ) -> Result<Option<MerchProduct>, RepositoryError> {
        let updated = sqlx::query_as::<_, MerchProduct>(&format!(
            r"
            UPDATE merch_products
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
