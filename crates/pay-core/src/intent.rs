//! # Payment Intent Types
//!
//! Request and response shapes for processor-owned payment intents,
//! plus the parsed webhook events that report their state changes.

use crate::amount::{Currency, PaymentAmount};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters for a new payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPaymentIntent {
    /// Amount in smallest currency unit
    pub amount: PaymentAmount,

    /// Currency
    pub currency: Currency,

    /// Let the processor pick eligible payment methods
    pub automatic_payment_methods: bool,

    /// Custom metadata stored on the intent
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl NewPaymentIntent {
    /// USD intent with automatic payment methods and a creation timestamp
    pub fn new(amount: PaymentAmount) -> Self {
        Self::at(amount, Utc::now())
    }

    /// Same as [`NewPaymentIntent::new`] with an explicit creation time
    pub fn at(amount: PaymentAmount, created_at: DateTime<Utc>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "timestamp".to_string(),
            created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );

        Self {
            amount,
            currency: Currency::USD,
            automatic_payment_methods: true,
            metadata,
        }
    }
}

/// A freshly created intent: only what the client needs to confirm it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPaymentIntent {
    /// Processor's intent ID
    pub id: String,

    /// One-time token for client-side confirmation
    pub client_secret: String,
}

/// A payment intent as reported by the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,

    /// Processor status, passed through verbatim
    pub status: String,

    pub amount: i64,

    pub currency: String,
}

/// Webhook event kinds the facade reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// `payment_intent.succeeded`
    PaymentSucceeded,
    /// `payment_intent.payment_failed`
    PaymentFailed,
    /// `payment_intent.created`
    PaymentIntentCreated,
    /// Anything else (passthrough)
    Unknown(String),
}

impl WebhookEventType {
    /// Map a processor event type string
    pub fn from_type_str(event_type: &str) -> Self {
        match event_type {
            "payment_intent.succeeded" => WebhookEventType::PaymentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
            "payment_intent.created" => WebhookEventType::PaymentIntentCreated,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }

    /// The processor's event type string
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::PaymentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentFailed => "payment_intent.payment_failed",
            WebhookEventType::PaymentIntentCreated => "payment_intent.created",
            WebhookEventType::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// ID of the object the event describes (`data.object.id`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// Raw `data.object` payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,

    /// When the provider created the event
    pub timestamp: DateTime<Utc>,
}

impl WebhookEvent {
    /// Object ID for log lines
    pub fn object_id_or_unknown(&self) -> &str {
        self.object_id.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_intent_defaults() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let intent = NewPaymentIntent::at(PaymentAmount::new(1000).unwrap(), created_at);

        assert_eq!(intent.amount.cents(), 1000);
        assert_eq!(intent.currency, Currency::USD);
        assert!(intent.automatic_payment_methods);
        assert_eq!(
            intent.metadata.get("timestamp").map(String::as_str),
            Some("2024-05-01T12:30:00.000Z")
        );
    }

    #[test]
    fn test_event_type_mapping() {
        assert_eq!(
            WebhookEventType::from_type_str("payment_intent.succeeded"),
            WebhookEventType::PaymentSucceeded
        );
        assert_eq!(
            WebhookEventType::from_type_str("payment_intent.payment_failed"),
            WebhookEventType::PaymentFailed
        );
        assert_eq!(
            WebhookEventType::from_type_str("payment_intent.created"),
            WebhookEventType::PaymentIntentCreated
        );

        let other = WebhookEventType::from_type_str("charge.refunded");
        assert_eq!(other, WebhookEventType::Unknown("charge.refunded".to_string()));
        assert_eq!(other.as_str(), "charge.refunded");
    }
}
