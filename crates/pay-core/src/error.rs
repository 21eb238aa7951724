//! # Payment Error Types
//!
//! Typed error handling for the payment intent facade.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Caller-supplied data failed validation (amount out of bounds, etc.)
    #[error("{0}")]
    Validation(String),

    /// The payment processor failed the call (auth, network, decline, not found, timeout)
    #[error("{0}")]
    Upstream(String),

    /// Webhook payload failed authenticity verification
    #[error("Webhook verification failed: {0}")]
    SignatureVerification(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_and_upstream_messages_are_bare() {
        assert_eq!(
            PaymentError::Validation("Amount is too large".into()).to_string(),
            "Amount is too large"
        );
        assert_eq!(
            PaymentError::Upstream("Invalid API Key provided".into()).to_string(),
            "Invalid API Key provided"
        );
    }

    #[test]
    fn test_prefixed_messages() {
        assert_eq!(
            PaymentError::SignatureVerification("mismatch".into()).to_string(),
            "Webhook verification failed: mismatch"
        );
        assert_eq!(
            PaymentError::Configuration("STRIPE_SECRET_KEY not set".into()).to_string(),
            "Configuration error: STRIPE_SECRET_KEY not set"
        );
        assert_eq!(
            PaymentError::Internal("boom".into()).to_string(),
            "Internal error: boom"
        );
    }
}
