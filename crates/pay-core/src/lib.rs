//! # pay-core
//!
//! Core types and traits for the payment intent facade.
//!
//! This crate provides:
//! - `PaymentProcessor` trait for the external payment processor
//! - `PaymentAmount` and `Currency` for validated amounts
//! - `NewPaymentIntent`, `PaymentIntent`, and `WebhookEvent` for the intent flow
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{NewPaymentIntent, PaymentAmount, PaymentProcessor};
//!
//! let amount = PaymentAmount::new(1000)?;
//! let created = processor.create_payment_intent(&NewPaymentIntent::new(amount)).await?;
//!
//! // Hand created.client_secret to the browser
//! ```

pub mod amount;
pub mod error;
pub mod intent;
pub mod processor;

// Re-exports for convenience
pub use amount::{Currency, PaymentAmount, MAX_AMOUNT, MIN_AMOUNT};
pub use error::{PaymentError, PaymentResult};
pub use intent::{
    CreatedPaymentIntent, NewPaymentIntent, PaymentIntent, WebhookEvent, WebhookEventType,
};
pub use processor::{BoxedPaymentProcessor, PaymentProcessor};
