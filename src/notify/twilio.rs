use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::{DeliveryError, SmsSender};
use crate::config::TwilioConfig;
use crate::models::{DeliveryReceipt, OutboundSms};

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    status: Option<String>,
}

/// Twilio REST client bound to one account and one sender number.
#[derive(Clone, Debug)]
pub struct TwilioClient {
    config: TwilioConfig,
    http: reqwest::Client,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, message: &OutboundSms) -> Result<DeliveryReceipt, DeliveryError> {
        let params = [
            ("To", message.destination.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", message.body.as_str()),
        ];

        let res = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // Twilio answers 201 with the message resource; tolerate anything else
        // that still signals success.
        let receipt = match serde_json::from_str::<MessageResource>(&body) {
            Ok(resource) => DeliveryReceipt {
                sid: resource.sid,
                status: resource.status,
            },
            Err(e) => {
                debug!(error = %e, "Unparseable Twilio response body");
                DeliveryReceipt {
                    sid: Uuid::new_v4().to_string(),
                    status: None,
                }
            }
        };

        Ok(receipt)
    }
}
