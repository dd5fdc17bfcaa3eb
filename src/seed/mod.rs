use tracing::info;

use crate::db::ProductCatalog;
use crate::error::AppResult;
use crate::models::NewProduct;

/// (code, name, is_original) for the demo catalog.
static FIXTURES: &[(&str, &str, bool)] = &[
    ("prod_1", "Product 1", false),
    ("prod_2", "Product 2", true),
    ("prod_3", "Product 3", false),
    ("prod_4", "Product 4", true),
];

pub fn fixture_products() -> Vec<NewProduct> {
    FIXTURES
        .iter()
        .map(|&(code, name, original)| NewProduct::new(code, name, original))
        .collect()
}

/// Insert the fixture products. Safe to run repeatedly.
pub async fn seed_products(catalog: &dyn ProductCatalog) -> AppResult<u64> {
    let fixtures = fixture_products();
    info!("Seeding {} fixture products...", fixtures.len());

    let inserted = catalog.insert_missing(&fixtures).await?;

    info!(inserted, skipped = fixtures.len() as u64 - inserted, "Seeding complete");
    Ok(inserted)
}
