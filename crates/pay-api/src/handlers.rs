//! # Request Handlers
//!
//! Axum request handlers for the payment intent API.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use chrono::{SecondsFormat, Utc};
use pay_core::{NewPaymentIntent, PaymentAmount};
use pay_stripe::dispatch_webhook_event;
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{error, info, instrument, warn};

/// Header Stripe signs webhook deliveries with
pub const SIGNATURE_HEADER: &str = "stripe-signature";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment intent request
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in cents; missing counts as too small
    #[serde(default, deserialize_with = "whole_amount")]
    pub amount: Option<i64>,
}

/// Accept any whole JSON number. Values beyond `i64` saturate so they still
/// fail range validation with the right message; fractions are rejected.
fn whole_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Some(cents) = number.as_i64() {
        return Ok(Some(cents));
    }
    if number.as_u64().is_some() {
        return Ok(Some(i64::MAX));
    }

    match number.as_f64() {
        // `as` saturates at the i64 bounds
        Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(f as i64)),
        _ => Err(de::Error::custom(format!(
            "invalid amount `{}`, expected an integer number of cents",
            number
        ))),
    }
}

/// Create payment intent response
#[derive(Debug, Serialize)]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

/// Payment intent status response
#[derive(Debug, Serialize)]
pub struct PaymentIntentStatusResponse {
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

/// Webhook acknowledgment
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub stripe_connected: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint. Liveness only; never calls the processor.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        stripe_connected: state.processor.is_configured(),
    })
}

/// Create a payment intent and return its client secret
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentIntentResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected create-payment-intent body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    info!("Creating payment intent for amount: {:?}", request.amount);

    let amount = PaymentAmount::from_optional(request.amount)?;

    let created = state
        .processor
        .create_payment_intent(&NewPaymentIntent::new(amount))
        .await
        .map_err(|e| {
            error!("Error creating payment intent: {}", e);
            ApiError::Upstream(format!("Failed to create payment intent: {}", e))
        })?;

    info!("Payment intent created: {}", created.id);

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: created.client_secret,
    }))
}

/// Get payment intent status
#[instrument(skip(state))]
pub async fn get_payment_intent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentIntentStatusResponse>, ApiError> {
    let intent = state
        .processor
        .retrieve_payment_intent(&id)
        .await
        .map_err(|e| {
            error!("Error retrieving payment intent: {}", e);
            ApiError::Upstream("Failed to retrieve payment intent".to_string())
        })?;

    Ok(Json(PaymentIntentStatusResponse {
        status: intent.status,
        amount: intent.amount,
        currency: intent.currency,
    }))
}

/// Handle processor webhook.
///
/// Every verified event is acknowledged, whatever the sink does with it,
/// so the processor does not redeliver.
#[instrument(skip(state, headers, body))]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        warn!("Webhook signature verification failed. Missing Stripe-Signature header");
        return Err(ApiError::SignatureVerification);
    };

    let event = state
        .processor
        .verify_webhook(&body, signature)
        .map_err(|e| {
            warn!("Webhook signature verification failed. {}", e);
            ApiError::SignatureVerification
        })?;

    info!(
        "Received webhook: type={}, id={}",
        event.event_type, event.event_id
    );

    if let Err(e) = dispatch_webhook_event(state.webhook_handler.as_ref(), &event) {
        error!(
            "Webhook handler error for {} ({}): {}",
            event.event_id, event.event_type, e
        );
    }

    Ok(Json(WebhookAck { received: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount_of(body: &str) -> Result<Option<i64>, serde_json::Error> {
        serde_json::from_str::<CreatePaymentIntentRequest>(body).map(|r| r.amount)
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(amount_of(r#"{"amount":1000}"#).unwrap(), Some(1000));
        assert_eq!(amount_of(r#"{"amount":-5}"#).unwrap(), Some(-5));
        assert_eq!(amount_of(r#"{"amount":null}"#).unwrap(), None);
        assert_eq!(amount_of(r#"{}"#).unwrap(), None);
    }

    #[test]
    fn test_huge_integers_saturate() {
        assert_eq!(
            amount_of(r#"{"amount":100000000000000000000}"#).unwrap(),
            Some(i64::MAX)
        );
        assert_eq!(
            amount_of(r#"{"amount":-100000000000000000000}"#).unwrap(),
            Some(i64::MIN)
        );
        assert_eq!(
            amount_of(r#"{"amount":18446744073709551615}"#).unwrap(),
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_fractions_and_strings_rejected() {
        assert!(amount_of(r#"{"amount":10.5}"#).is_err());
        assert!(amount_of(r#"{"amount":"1000"}"#).is_err());
    }
}
