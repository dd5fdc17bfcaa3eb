use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{NewProduct, Product};

/// Read access to the product catalog, plus the one write the seeder needs.
///
/// `find_by_identifier` distinguishes "no such product" (`Ok(None)`) from a
/// store that could not answer (`Err(AppError::Database)`).
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<Product>>;

    /// Inserts rows whose identifier is not in the catalog yet and returns
    /// how many were added.
    async fn insert_missing(&self, products: &[NewProduct]) -> AppResult<u64>;

    async fn count(&self) -> AppResult<i64>;
}

/// Postgres-backed catalog over the `products` table.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for PgCatalog {
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, product_id, name, is_original, created_at
             FROM products WHERE product_id = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn insert_missing(&self, products: &[NewProduct]) -> AppResult<u64> {
        let ids: Vec<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        let flags: Vec<bool> = products.iter().map(|p| p.is_original).collect();

        // Single round trip; existing identifiers are left untouched.
        let result = sqlx::query(
            r#"
            INSERT INTO products (product_id, name, is_original)
            SELECT * FROM UNNEST($1::text[], $2::text[], $3::bool[])
            ON CONFLICT (product_id) DO NOTHING
            "#,
        )
        .bind(&ids)
        .bind(&names)
        .bind(&flags)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
