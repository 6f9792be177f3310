//! Product repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use sentra_core::{ProductId, ProductType, Rupiah};

use super::RepositoryError;
use crate::models::{Product, ProductInput};

const PRODUCT_COLUMNS: &str = "id, name, type AS product_type, price, description, image, items, \
                               is_active, sort_order, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    product_type: ProductType,
    price: i64,
    description: Option<String>,
    image: Option<String>,
    items: Option<Json<Vec<String>>>,
    is_active: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            product_type: row.product_type,
            price: Rupiah::new(row.price),
            description: row.description,
            image: row.image,
            items: row.items.map(|Json(items)| items),
            is_active: row.is_active,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Empty bundle lists are stored as NULL.
fn items_param(input: &ProductInput) -> Option<Json<Vec<String>>> {
    input
        .items
        .as_ref()
        .filter(|items| !items.is_empty())
        .map(|items| Json(items.clone()))
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product by ascending sort order. Inactive products are included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY sort_order ASC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO products (name, type, price, description, image, items, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(input.product_type)
        .bind(input.price)
        .bind(input.description.as_deref())
        .bind(input.image.as_deref().filter(|s| !s.is_empty()))
        .bind(items_param(input))
        .bind(input.is_active.unwrap_or(true))
        .bind(input.sort_order)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a product's writable fields.
    ///
    /// Returns `None` when no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE products
            SET name = $2, type = $3, price = $4, description = $5, image = $6, items = $7,
                is_active = COALESCE($8, is_active), sort_order = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.product_type)
        .bind(input.price)
        .bind(input.description.as_deref())
        .bind(input.image.as_deref().filter(|s| !s.is_empty()))
        .bind(items_param(input))
        .bind(input.is_active)
        .bind(input.sort_order)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a product. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether a product with this name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE name = $1)")
                .bind(name)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }
}
