//! # Application State
//!
//! Shared state for the Axum application.
//! Built once at startup and handed to every handler through `State`.

use pay_core::BoxedPaymentProcessor;
use pay_stripe::{LoggingWebhookHandler, StripeProcessor, WebhookHandler};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory holding the landing page (`index.html`)
    pub static_dir: PathBuf,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            json_logs: lookup("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor client
    pub processor: BoxedPaymentProcessor,
    /// Sink for verified webhook events
    pub webhook_handler: Arc<dyn WebhookHandler>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state backed by Stripe, configured from the environment.
    ///
    /// Fails when the Stripe secrets are missing or malformed.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let stripe = StripeProcessor::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        let mode = if stripe.config().is_test_mode() { "test" } else { "live" };
        tracing::info!(mode, "Stripe client configured");

        if stripe.config().is_live_mode() && !config.is_production() {
            tracing::warn!("Using live Stripe keys outside production");
        }

        Ok(Self::with_processor(Arc::new(stripe), config))
    }

    /// Create state around an existing processor (logging webhook sink)
    pub fn with_processor(processor: BoxedPaymentProcessor, config: AppConfig) -> Self {
        Self {
            processor,
            webhook_handler: Arc::new(LoggingWebhookHandler),
            config,
        }
    }

    /// Builder: replace the webhook event sink
    pub fn with_webhook_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.webhook_handler = handler;
        self
    }
}
