//! # Payment Processor Trait
//!
//! The seam between the HTTP facade and the external payment processor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProcessor (trait)                   │
//! │  ├── create_payment_intent()                                │
//! │  ├── retrieve_payment_intent()                              │
//! │  ├── verify_webhook()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┴─────────────────┐
//!  ┌───────┴───────┐                   ┌───────┴───────┐
//!  │StripeProcessor│                   │  test doubles │
//!  └───────────────┘                   └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::intent::{CreatedPaymentIntent, NewPaymentIntent, PaymentIntent, WebhookEvent};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for a payment processor's intent API.
///
/// Every failure of the remote call (network, auth, decline, not found,
/// timeout) is reported as [`crate::PaymentError::Upstream`].
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a payment intent and return its client secret.
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> PaymentResult<CreatedPaymentIntent>;

    /// Fetch a payment intent by its processor-issued ID.
    async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes
    /// * `signature` - Signature header from the request
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// Whether the client holds credentials. Does not touch the network.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Type alias for a shared payment processor (dynamic dispatch)
pub type BoxedPaymentProcessor = Arc<dyn PaymentProcessor>;
