//! # Payment Facade
//!
//! HTTP facade over Stripe Payment Intents.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//!
//! # Run the server
//! payment-facade
//! ```

use pay_api::{routes, AppConfig, AppState};
use pay_stripe::REQUIRED_WEBHOOK_EVENTS;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    init_tracing(config.json_logs);

    // Fails fast when Stripe secrets are absent
    let state = AppState::new(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.processor.provider_name());
    info!("Static files: {}", state.config.static_dir.display());

    let app = routes::create_router(state);

    info!("Server running on http://{}", addr);

    if !is_prod {
        info!("Create intent: POST http://{}/create-payment-intent", addr);
        info!("Webhook: POST http://{}/webhook", addr);
        info!("Webhook events to enable: {}", REQUIRED_WEBHOOK_EVENTS.join(", "));
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let (plain, json) = if json_logs {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(plain)
        .with(json)
        .with(filter)
        .init();
}
