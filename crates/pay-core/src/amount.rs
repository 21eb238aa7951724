//! # Amount Types
//!
//! Currency codes and validated payment amounts.
//! Amounts are always carried in the smallest currency unit (cents for USD).

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Smallest chargeable amount in cents
pub const MIN_AMOUNT: i64 = 50;

/// Largest chargeable amount in cents
pub const MAX_AMOUNT: i64 = 99_999_999;

/// Settlement currency (ISO 4217). Intents are only ever created in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
}

impl Currency {
    /// Returns the lowercase ISO 4217 code used on the processor wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }
}

/// A chargeable amount in cents, guaranteed to lie within
/// [`MIN_AMOUNT`]..=[`MAX_AMOUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PaymentAmount(i64);

impl PaymentAmount {
    /// Validate a raw cent amount.
    pub fn new(cents: i64) -> PaymentResult<Self> {
        if cents < MIN_AMOUNT {
            return Err(PaymentError::Validation(
                "Amount must be at least 50 cents".to_string(),
            ));
        }
        if cents > MAX_AMOUNT {
            return Err(PaymentError::Validation("Amount is too large".to_string()));
        }
        Ok(Self(cents))
    }

    /// Validate an optional amount; a missing amount counts as too small.
    pub fn from_optional(cents: Option<i64>) -> PaymentResult<Self> {
        Self::new(cents.unwrap_or(0))
    }

    /// Amount in cents
    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(PaymentAmount::new(50).unwrap().cents(), 50);
        assert_eq!(PaymentAmount::new(99_999_999).unwrap().cents(), 99_999_999);
    }

    #[test]
    fn test_too_small() {
        for cents in [49, 0, -1, i64::MIN] {
            let err = PaymentAmount::new(cents).unwrap_err();
            assert_eq!(err.to_string(), "Amount must be at least 50 cents");
        }
    }

    #[test]
    fn test_too_large() {
        for cents in [100_000_000, i64::MAX] {
            let err = PaymentAmount::new(cents).unwrap_err();
            assert_eq!(err.to_string(), "Amount is too large");
        }
    }

    #[test]
    fn test_missing_amount_is_too_small() {
        let err = PaymentAmount::from_optional(None).unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));
        assert_eq!(err.to_string(), "Amount must be at least 50 cents");
    }

    #[test]
    fn test_currency_wire_code() {
        assert_eq!(Currency::USD.as_str(), "usd");
        assert_eq!(serde_json::to_string(&Currency::USD).unwrap(), "\"usd\"");
    }
}
