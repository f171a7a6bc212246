//! Stripe API client for payment intents.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

use pc_house_core::CurrencyCode;

use super::payments::{IntentRequest, PaymentError, PaymentIntent, PaymentProcessor};
use crate::config::StripeConfig;

/// Upper bound on a single processor call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    intents_url: Url,
    currency: CurrencyCode,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value, the base URL
    /// cannot be joined, or the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymentError::Config(format!("Invalid secret key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let intents_url = config
            .api_base
            .join("/v1/payment_intents")
            .map_err(|e| PaymentError::Config(format!("Invalid API base: {e}")))?;

        Ok(Self {
            client,
            intents_url,
            currency: config.currency,
        })
    }

    /// Form fields for a card payment intent.
    fn intent_form(&self, request: &IntentRequest) -> Vec<(&'static str, String)> {
        vec![
            ("amount", request.amount.to_string()),
            ("currency", self.currency.as_str().to_string()),
            ("payment_method_types[]", "card".to_string()),
            ("metadata[order_id]", request.order_id.to_string()),
        ]
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_intent(&self, request: IntentRequest) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .client
            .post(self.intents_url.clone())
            .form(&self.intent_form(&request))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or(body, |e| e.error.message.unwrap_or_default());
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: IntentResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| PaymentError::Parse("intent has no client_secret".to_string()))?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pc_house_core::OrderId;
    use secrecy::SecretString;

    use super::*;

    fn config(base: &str) -> StripeConfig {
        StripeConfig {
            secret_key: SecretString::from("sk_test_123".to_string()),
            api_base: Url::parse(base).unwrap(),
            currency: CurrencyCode::Eur,
        }
    }

    #[test]
    fn test_intents_url() {
        let client = StripeClient::new(&config("https://api.stripe.com")).unwrap();
        assert_eq!(
            client.intents_url.as_str(),
            "https://api.stripe.com/v1/payment_intents"
        );
    }

    #[test]
    fn test_intent_form() {
        let client = StripeClient::new(&config("https://api.stripe.com")).unwrap();
        let order_id = OrderId::generate();
        let form = client.intent_form(&IntentRequest {
            amount: 10000,
            order_id,
        });

        assert!(form.contains(&("amount", "10000".to_string())));
        assert!(form.contains(&("currency", "eur".to_string())));
        assert!(form.contains(&("payment_method_types[]", "card".to_string())));
        assert!(form.contains(&("metadata[order_id]", order_id.to_string())));
    }

    #[test]
    fn test_error_body_parsing() {
        let body = r#"{"error":{"type":"card_error","message":"Your card was declined."}}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.error.message.as_deref(),
            Some("Your card was declined.")
        );
    }
}
