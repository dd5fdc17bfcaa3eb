use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Catalog entry. `product_id` is the code customers text in; it is unique
/// and never changes once the row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub product_id: String,
    pub name: String,
    pub is_original: bool,
    pub created_at: DateTime<Utc>,
}

/// Row to insert when seeding the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub product_id: String,
    pub name: String,
    pub is_original: bool,
}

impl NewProduct {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, is_original: bool) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            is_original,
        }
    }

    /// Materialise the row the way the database would return it.
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::new_v4(),
            product_id: self.product_id,
            name: self.name,
            is_original: self.is_original,
            created_at: Utc::now(),
        }
    }
}
