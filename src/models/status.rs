use std::fmt;

use super::Product;

/// What the customer is told about the code they sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductStatus {
    NotAvailable,
    Original(String),
    Fake(String),
}

impl ProductStatus {
    pub fn from_lookup(product: Option<&Product>) -> Self {
        match product {
            None => ProductStatus::NotAvailable,
            Some(p) if p.is_original => ProductStatus::Original(p.name.clone()),
            Some(p) => ProductStatus::Fake(p.name.clone()),
        }
    }

    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ProductStatus::NotAvailable => "not_available",
            ProductStatus::Original(_) => "original",
            ProductStatus::Fake(_) => "fake",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::NotAvailable => f.write_str("Product not available"),
            ProductStatus::Original(name) => write!(f, "Original '{name}', BUY NOW!!"),
            ProductStatus::Fake(name) => write!(f, "Fake '{name}', DON'T BUY!!"),
        }
    }
}
