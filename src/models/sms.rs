use serde::Deserialize;

/// Form payload Twilio posts when an SMS arrives. Other fields Twilio sends
/// (`To`, `MessageSid`, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body")]
    pub body: String,
}

/// One reply to submit to the messaging provider. The origin number is part
/// of the sender's configuration, not of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundSms {
    pub destination: String,
    pub body: String,
}

/// What the provider hands back for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub sid: String,
    pub status: Option<String>,
}
