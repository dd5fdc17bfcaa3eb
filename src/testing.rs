//! In-memory stand-ins for the catalog and the SMS provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::ProductCatalog;
use crate::error::AppResult;
use crate::models::{DeliveryReceipt, NewProduct, OutboundSms, Product};
use crate::notify::{DeliveryError, SmsSender};

#[derive(Default)]
pub struct MemoryCatalog {
    products: Mutex<Vec<Product>>,
}

impl MemoryCatalog {
    pub fn with(rows: Vec<NewProduct>) -> Self {
        Self {
            products: Mutex::new(rows.into_iter().map(NewProduct::into_product).collect()),
        }
    }
}

#[async_trait]
impl ProductCatalog for MemoryCatalog {
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<Product>> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.product_id == identifier).cloned())
    }

    async fn insert_missing(&self, rows: &[NewProduct]) -> AppResult<u64> {
        let mut products = self.products.lock().unwrap();
        let mut inserted = 0;
        for row in rows {
            if !products.iter().any(|p| p.product_id == row.product_id) {
                products.push(row.clone().into_product());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.products.lock().unwrap().len() as i64)
    }
}

/// Catalog whose store is always down.
pub struct UnavailableCatalog;

#[async_trait]
impl ProductCatalog for UnavailableCatalog {
    async fn find_by_identifier(&self, _identifier: &str) -> AppResult<Option<Product>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn insert_missing(&self, _rows: &[NewProduct]) -> AppResult<u64> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn count(&self) -> AppResult<i64> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

/// Accepts every message and keeps a copy.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundSms>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<OutboundSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for RecordingSender {
    async fn send(&self, message: &OutboundSms) -> Result<DeliveryReceipt, DeliveryError> {
        let mut sent = self.sent.lock().unwrap();
        let sid = format!("SM{}", sent.len());
        sent.push(message.clone());
        Ok(DeliveryReceipt {
            sid,
            status: Some("queued".to_string()),
        })
    }
}

/// Rejects every message as if the credentials were wrong.
#[derive(Default)]
pub struct FailingSender {
    attempts: AtomicUsize,
}

impl FailingSender {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsSender for FailingSender {
    async fn send(&self, _message: &OutboundSms) -> Result<DeliveryReceipt, DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Rejected {
            status: 401,
            body: r#"{"code":20003,"message":"Authenticate"}"#.to_string(),
        })
    }
}
