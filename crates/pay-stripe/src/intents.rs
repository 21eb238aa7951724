//! # Stripe Payment Intents
//!
//! Implementation of the Stripe Payment Intents API.
//! Intents are created server-side and confirmed in the browser with the
//! returned client secret.

use crate::config::StripeConfig;
use crate::webhook::WebhookVerifier;
use async_trait::async_trait;
use pay_core::{
    CreatedPaymentIntent, NewPaymentIntent, PaymentError, PaymentIntent, PaymentProcessor,
    PaymentResult, WebhookEvent,
};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Stripe Payment Intents client
pub struct StripeProcessor {
    config: StripeConfig,
    client: Client,
    verifier: WebhookVerifier,
}

impl StripeProcessor {
    /// Create a new Stripe client. Every request is bounded by `config.timeout`.
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let verifier = WebhookVerifier::new(&config.webhook_secret, config.webhook_tolerance_secs);

        Ok(Self {
            config,
            client,
            verifier,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build `{api_base_url}/v1/payment_intents[/...]`, percent-encoding each segment
    fn intents_url(&self, extra: Option<&str>) -> PaymentResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            PaymentError::Configuration(format!("Invalid Stripe API base URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::Configuration("Stripe API base URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(["v1", "payment_intents"])
            .extend(extra);

        Ok(url)
    }

    /// Build the form body for `POST /v1/payment_intents`
    fn intent_form(intent: &NewPaymentIntent) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), intent.amount.cents().to_string()),
            ("currency".to_string(), intent.currency.as_str().to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                intent.automatic_payment_methods.to_string(),
            ),
        ];

        for (key, value) in &intent.metadata {
            form_params.push((format!("metadata[{}]", key), value.clone()));
        }

        form_params
    }

    /// Read a Stripe response body, mapping non-2xx statuses to upstream errors
    async fn read_body(response: Response) -> PaymentResult<String> {
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::Upstream(error_response.error.message));
            }

            return Err(PaymentError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        Ok(body)
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    #[instrument(skip(self, intent), fields(amount = intent.amount.cents()))]
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> PaymentResult<CreatedPaymentIntent> {
        let form_params = Self::intent_form(intent);
        let url = self.intents_url(None)?;

        debug!(
            "Creating Stripe payment intent: amount={}, currency={}",
            intent.amount,
            intent.currency.as_str()
        );

        let response = self
            .client
            .post(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(request_error)?;

        let body = Self::read_body(response).await?;

        let created: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Upstream(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = created.client_secret.ok_or_else(|| {
            PaymentError::Upstream("Stripe response is missing client_secret".to_string())
        })?;

        info!("Created Stripe payment intent: id={}", created.id);

        Ok(CreatedPaymentIntent {
            id: created.id,
            client_secret,
        })
    }

    #[instrument(skip(self))]
    async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent> {
        let url = self.intents_url(Some(id))?;

        let response = self
            .client
            .get(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(request_error)?;

        let body = Self::read_body(response).await?;

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Upstream(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(PaymentIntent {
            id: intent.id,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
        })
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent> {
        self.verifier.verify(payload, signature)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }

    fn is_configured(&self) -> bool {
        !self.config.secret_key.is_empty()
    }
}

fn request_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::Upstream("Request to Stripe timed out".to_string())
    } else {
        PaymentError::Upstream(e.to_string())
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    status: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
