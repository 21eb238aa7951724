//! # API Errors
//!
//! Maps domain errors onto the wire bodies clients and Stripe see.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pay_core::PaymentError;
use serde::Serialize;
use std::any::Any;
use tracing::error;

/// Plain-text body for rejected webhooks
pub const WEBHOOK_VERIFICATION_FAILED: &str = "Webhook signature verification failed.";

/// Body for anything that escapes a handler
pub const GENERIC_ERROR: &str = "Something went wrong!";

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Handler-boundary error
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request or amount out of bounds (400, JSON)
    BadRequest(String),
    /// Payment processor failure (500, JSON)
    Upstream(String),
    /// Webhook failed authentication (400, plain text)
    SignatureVerification,
    /// Anything else (500, generic JSON)
    Internal,
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Validation(message) => ApiError::BadRequest(message),
            PaymentError::Upstream(message) => ApiError::Upstream(message),
            PaymentError::SignatureVerification(_) => ApiError::SignatureVerification,
            other => {
                error!("Internal error: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }
            ApiError::Upstream(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(message)),
            )
                .into_response(),
            ApiError::SignatureVerification => {
                (StatusCode::BAD_REQUEST, WEBHOOK_VERIFICATION_FAILED).into_response()
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(GENERIC_ERROR)),
            )
                .into_response(),
        }
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
/// The panic message is logged, never returned.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("Unhandled error in request handler: {}", detail);
    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error");
        assert_eq!(err.error, "Test error");
    }

    #[test]
    fn test_payment_error_conversion() {
        let response = ApiError::from(PaymentError::Validation("Amount is too large".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(PaymentError::Upstream("declined".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response =
            ApiError::from(PaymentError::SignatureVerification("mismatch".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(PaymentError::Internal("oops".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_response_is_generic() {
        let response = handle_panic(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
