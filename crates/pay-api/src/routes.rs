//! # Routes
//!
//! Axum router configuration for the payment intent API.

use crate::error::handle_panic;
use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - POST /create-payment-intent - Create intent, returns client secret
///   - GET  /payment-intent/{id}   - Intent status
///   - POST /webhook               - Stripe webhook handler
///   - GET  /health                - Liveness check
///   - GET  /                      - Landing page (static dir fallback)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route("/payment-intent/{id}", get(handlers::get_payment_intent))
        .route("/webhook", post(handlers::webhook))
        .route("/health", get(handlers::health))
        .fallback_service(static_files)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        // State
        .with_state(state)
}
