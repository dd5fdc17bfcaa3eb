use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::db::ProductCatalog;
use crate::error::AppResult;
use crate::metrics::{MetricEntry, MetricsStore};
use crate::models::{DeliveryReceipt, OutboundSms, ProductStatus};
use crate::notify::{DeliveryError, SmsSender};

/// Body returned to the webhook caller once the code has been looked up.
pub const ACKNOWLEDGEMENT: &str = "message received";

/// Result of one verification request.
#[derive(Debug)]
pub struct Verification {
    pub status: ProductStatus,
    pub delivery: Result<DeliveryReceipt, DeliveryError>,
}

/// Looks a product code up and texts the verdict back to whoever sent it.
pub struct Verifier {
    catalog: Arc<dyn ProductCatalog>,
    sender: Arc<dyn SmsSender>,
    metrics: Arc<RwLock<MetricsStore>>,
}

impl Verifier {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        sender: Arc<dyn SmsSender>,
        metrics: Arc<RwLock<MetricsStore>>,
    ) -> Self {
        Self {
            catalog,
            sender,
            metrics,
        }
    }

    /// Runs the lookup and sends exactly one reply to `sender_address`.
    ///
    /// A catalog failure aborts before anything is sent. A delivery failure
    /// does not: it is logged and reported in [`Verification::delivery`].
    pub async fn verify(
        &self,
        sender_address: &str,
        queried_identifier: &str,
    ) -> AppResult<Verification> {
        let lookup_start = Instant::now();
        let product = self.catalog.find_by_identifier(queried_identifier).await?;
        let lookup_elapsed = lookup_start.elapsed();

        let status = ProductStatus::from_lookup(product.as_ref());
        info!(
            from = %sender_address,
            code = %queried_identifier,
            status = status.label(),
            "Verified product code"
        );

        let message = OutboundSms {
            destination: sender_address.to_string(),
            body: status.to_string(),
        };

        let delivery_start = Instant::now();
        let delivery = self.sender.send(&message).await;
        let delivery_elapsed = delivery_start.elapsed();

        match &delivery {
            Ok(receipt) => info!(
                to = %message.destination,
                sid = %receipt.sid,
                provider_status = receipt.status.as_deref().unwrap_or("unknown"),
                elapsed_ms = delivery_elapsed.as_millis(),
                "Reply sent"
            ),
            Err(e) => warn!(
                to = %message.destination,
                error = %e,
                "Reply could not be delivered"
            ),
        }

        self.record(&status, &delivery, lookup_elapsed, delivery_elapsed)
            .await;

        Ok(Verification { status, delivery })
    }

    async fn record(
        &self,
        status: &ProductStatus,
        delivery: &Result<DeliveryReceipt, DeliveryError>,
        lookup_elapsed: Duration,
        delivery_elapsed: Duration,
    ) {
        let delivered = match delivery {
            Ok(receipt) => MetricEntry::new(
                "deliver",
                "sent",
                delivery_elapsed.as_nanos() as u64,
                true,
                Some(receipt.sid.clone()),
            ),
            Err(e) => MetricEntry::new(
                "deliver",
                "failed",
                delivery_elapsed.as_nanos() as u64,
                false,
                Some(e.to_string()),
            ),
        };

        let mut metrics = self.metrics.write().await;
        metrics.record(MetricEntry::new(
            "lookup",
            status.label(),
            lookup_elapsed.as_nanos() as u64,
            true,
            None,
        ));
        metrics.record(delivered);
    }

    /// Same as [`Verifier::verify`], answering with the webhook acknowledgement.
    pub async fn handle(
        &self,
        sender_address: &str,
        queried_identifier: &str,
    ) -> AppResult<&'static str> {
        let verification = self.verify(sender_address, queried_identifier).await?;
        debug!(
            status = verification.status.label(),
            delivered = verification.delivery.is_ok(),
            "Acknowledging webhook"
        );
        Ok(ACKNOWLEDGEMENT)
    }
}
