//! # Stripe Webhook Handling
//!
//! Signature verification for Stripe webhooks and dispatch of verified
//! events to a [`WebhookHandler`].
//!
//! Stripe signs each delivery with a `Stripe-Signature` header of the form
//! `t=<unix seconds>,v1=<hex hmac>[,v1=...]`. The HMAC-SHA256 is computed
//! over `"<t>.<raw body>"` with the endpoint's signing secret.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use pay_core::{PaymentError, PaymentResult, WebhookEvent, WebhookEventType};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Default signature timestamp tolerance (5 minutes)
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Events that should be enabled on the Stripe webhook endpoint
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &[
    "payment_intent.created",
    "payment_intent.succeeded",
    "payment_intent.payment_failed",
];

// =============================================================================
// Signature Verification
// =============================================================================

/// Verifies `Stripe-Signature` headers and parses the signed payload.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    /// Verify against the current clock.
    pub fn verify(&self, payload: &[u8], header: &str) -> PaymentResult<WebhookEvent> {
        self.verify_at(payload, header, Utc::now().timestamp())
    }

    /// Verify as if the current time were `now` (unix seconds).
    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> PaymentResult<WebhookEvent> {
        let sig_parts = parse_signature_header(header)?;

        // `t=` is caller-controlled; the difference must not overflow
        let tolerance = self.tolerance_secs.unsigned_abs();
        if now.abs_diff(sig_parts.timestamp) > tolerance {
            return Err(PaymentError::SignatureVerification(
                "Timestamp outside tolerance".to_string(),
            ));
        }

        let mac = signed_payload_mac(&self.secret, sig_parts.timestamp, payload)?;

        let valid = sig_parts.signatures.iter().any(|sig| {
            hex::decode(sig)
                .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
                .unwrap_or(false)
        });

        if !valid {
            return Err(PaymentError::SignatureVerification(
                "Signature mismatch".to_string(),
            ));
        }

        parse_event(payload)
    }
}

/// Build a valid `Stripe-Signature` header for `payload` signed at `timestamp`.
///
/// Mirrors the test-header helpers in Stripe's SDKs; used to exercise
/// webhook endpoints locally.
pub fn signature_header(secret: &str, payload: &[u8], timestamp: i64) -> PaymentResult<String> {
    let mac = signed_payload_mac(secret, timestamp, payload)?;
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::SignatureVerification("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::SignatureVerification(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    data: Option<StripeEventData>,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

// Only called once the signature has been checked.
fn parse_event(payload: &[u8]) -> PaymentResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        PaymentError::SignatureVerification(format!("Failed to parse webhook: {}", e))
    })?;

    debug!("Verified Stripe webhook: type={}", event.event_type);

    let object = event.data.map(|d| d.object);
    let object_id = object
        .as_ref()
        .and_then(|o| o.get("id"))
        .and_then(|v| v.as_str())
        .map(String::from);

    Ok(WebhookEvent {
        event_id: event.id,
        event_type: WebhookEventType::from_type_str(&event.event_type),
        provider: "stripe".to_string(),
        object_id,
        raw_data: object.map(serde_json::Value::Object),
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

// =============================================================================
// Dispatch
// =============================================================================

/// Webhook event handler trait
///
/// Implement this trait to persist or notify on payment outcomes.
/// The defaults only log.
pub trait WebhookHandler: Send + Sync {
    /// Called when a payment succeeds
    fn on_payment_succeeded(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Payment succeeded: {}", event.object_id_or_unknown());
        Ok(())
    }

    /// Called when a payment fails
    fn on_payment_failed(&self, event: &WebhookEvent) -> PaymentResult<()> {
        warn!("Payment failed: {}", event.object_id_or_unknown());
        Ok(())
    }

    /// Called when a payment intent is created
    fn on_intent_created(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Payment intent created: {}", event.object_id_or_unknown());
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unhandled_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Unhandled event type: {}", event.event_type);
        Ok(())
    }
}

/// Default webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a webhook event to the appropriate handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: &WebhookEvent,
) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::PaymentSucceeded => handler.on_payment_succeeded(event),
        WebhookEventType::PaymentFailed => handler.on_payment_failed(event),
        WebhookEventType::PaymentIntentCreated => handler.on_intent_created(event),
        WebhookEventType::Unknown(_) => handler.on_unhandled_event(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    const SECRET: &str = "whsec_test_secret";
    const NOW: i64 = 1_700_000_000;

    fn payload(event_type: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_123",
            "type": event_type,
            "created": NOW,
            "data": { "object": { "id": "pi_123", "amount": 1000 } }
        }))
        .unwrap()
    }

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SECRET, DEFAULT_TOLERANCE_SECS)
    }

    #[test]
    fn test_parse_signature_header() {
        let header = "t=1234567890,v1=abc123,v1=def456,v0=old";
        let parsed = parse_signature_header(header).unwrap();

        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures, vec!["abc123", "def456"]);
    }

    #[test]
    fn test_parse_signature_header_rejects_incomplete() {
        assert!(parse_signature_header("v1=abc").is_err());
        assert!(parse_signature_header("t=123").is_err());
        assert!(parse_signature_header("").is_err());
    }

    #[test]
    fn test_valid_signature_parses_event() {
        let body = payload("payment_intent.succeeded");
        let header = signature_header(SECRET, &body, NOW).unwrap();

        let event = verifier().verify_at(&body, &header, NOW + 10).unwrap();

        assert_eq!(event.event_id, "evt_123");
        assert_eq!(event.event_type, WebhookEventType::PaymentSucceeded);
        assert_eq!(event.object_id.as_deref(), Some("pi_123"));
        assert_eq!(event.timestamp.timestamp(), NOW);
        assert_eq!(event.raw_data.unwrap()["amount"], 1000);
    }

    #[test]
    fn test_any_matching_v1_is_accepted() {
        let body = payload("payment_intent.created");
        let good = signature_header(SECRET, &body, NOW).unwrap();
        let good_sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t={},v1={},v1={}", NOW, "00".repeat(32), good_sig);

        assert!(verifier().verify_at(&body, &header, NOW).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let body = payload("payment_intent.succeeded");
        let header = signature_header(SECRET, &body, NOW).unwrap();
        let tampered = payload("payment_intent.payment_failed");

        let err = verifier().verify_at(&tampered, &header, NOW).unwrap_err();
        assert!(matches!(err, PaymentError::SignatureVerification(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = payload("payment_intent.succeeded");
        let header = signature_header("whsec_other", &body, NOW).unwrap();

        assert!(verifier().verify_at(&body, &header, NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let body = payload("payment_intent.succeeded");
        let header = signature_header(SECRET, &body, NOW).unwrap();

        let err = verifier()
            .verify_at(&body, &header, NOW + DEFAULT_TOLERANCE_SECS + 1)
            .unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_extreme_timestamps_rejected() {
        let body = payload("payment_intent.succeeded");
        let sig = "00".repeat(32);

        for t in [i64::MIN, i64::MAX] {
            let header = format!("t={},v1={}", t, sig);
            let err = verifier().verify_at(&body, &header, NOW).unwrap_err();
            assert!(matches!(err, PaymentError::SignatureVerification(_)));
        }
    }

    #[test]
    fn test_signed_garbage_rejected() {
        let body = b"not json".to_vec();
        let header = signature_header(SECRET, &body, NOW).unwrap();

        let err = verifier().verify_at(&body, &header, NOW).unwrap_err();
        assert!(matches!(err, PaymentError::SignatureVerification(_)));
    }

    #[test]
    fn test_dispatch_routes_by_type() {
        #[derive(Default)]
        struct Recorder {
            calls: Mutex<Vec<&'static str>>,
        }

        impl WebhookHandler for Recorder {
            fn on_payment_succeeded(&self, _event: &WebhookEvent) -> PaymentResult<()> {
                self.calls.lock().unwrap().push("succeeded");
                Ok(())
            }
            fn on_payment_failed(&self, _event: &WebhookEvent) -> PaymentResult<()> {
                self.calls.lock().unwrap().push("failed");
                Ok(())
            }
            fn on_intent_created(&self, _event: &WebhookEvent) -> PaymentResult<()> {
                self.calls.lock().unwrap().push("created");
                Ok(())
            }
            fn on_unhandled_event(&self, _event: &WebhookEvent) -> PaymentResult<()> {
                self.calls.lock().unwrap().push("unknown");
                Ok(())
            }
        }

        let handler = Recorder::default();
        for event_type in [
            "payment_intent.succeeded",
            "payment_intent.payment_failed",
            "payment_intent.created",
            "customer.created",
        ] {
            let event = parse_event(&payload(event_type)).unwrap();
            dispatch_webhook_event(&handler, &event).unwrap();
        }

        assert_eq!(
            *handler.calls.lock().unwrap(),
            vec!["succeeded", "failed", "created", "unknown"]
        );
    }

    #[test]
    fn test_logging_handler_accepts_everything() {
        let event = parse_event(&payload("invoice.paid")).unwrap();
        assert!(dispatch_webhook_event(&LoggingWebhookHandler, &event).is_ok());
    }
}
