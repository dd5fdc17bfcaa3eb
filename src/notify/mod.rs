//! Outbound SMS delivery.
//!
//! [`SmsSender`] is the seam the verifier talks to; [`TwilioClient`] is the
//! production implementation backed by the Twilio Messages REST API.

mod twilio;

use async_trait::async_trait;

use crate::models::{DeliveryReceipt, OutboundSms};

pub use twilio::TwilioClient;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The request never got a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider rejected message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Submit a single message. No retries happen here.
    async fn send(&self, message: &OutboundSms) -> Result<DeliveryReceipt, DeliveryError>;
}
