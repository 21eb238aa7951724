//! # pay-stripe
//!
//! Stripe Payment Intents client for the payment intent facade.
//!
//! - **StripeProcessor** creates and retrieves payment intents over the
//!   Stripe REST API and verifies webhook signatures.
//! - **WebhookHandler** receives verified events; `LoggingWebhookHandler`
//!   is the default sink.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_core::{NewPaymentIntent, PaymentAmount, PaymentProcessor};
//! use pay_stripe::StripeProcessor;
//!
//! let stripe = StripeProcessor::from_env()?;
//! let created = stripe
//!     .create_payment_intent(&NewPaymentIntent::new(PaymentAmount::new(1000)?))
//!     .await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_stripe::{dispatch_webhook_event, WebhookHandler};
//!
//! struct MyHandler;
//!
//! impl WebhookHandler for MyHandler {
//!     fn on_payment_succeeded(&self, event: &WebhookEvent) -> PaymentResult<()> {
//!         // Mark the order paid
//!         Ok(())
//!     }
//! }
//!
//! let event = stripe.verify_webhook(payload, signature)?;
//! dispatch_webhook_event(&MyHandler, &event)?;
//! ```

pub mod config;
pub mod intents;
pub mod webhook;

// Re-exports
pub use config::StripeConfig;
pub use intents::StripeProcessor;
pub use webhook::{
    dispatch_webhook_event, signature_header, LoggingWebhookHandler, WebhookHandler,
    WebhookVerifier, REQUIRED_WEBHOOK_EVENTS,
};
