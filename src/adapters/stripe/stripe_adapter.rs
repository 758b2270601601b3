//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API.
//! Requests are form-encoded and authenticated with HTTP basic auth using
//! the secret key as the username.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(SecretString::new(api_key));
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::PaymentConfig;
use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateSubscriptionRequest, Customer,
    PaymentError, PaymentErrorCode, PaymentIntent, PaymentProvider, Subscription,
};

use super::stripe_types::{
    StripeCustomer, StripeErrorBody, StripeList, StripePaymentIntent, StripeSubscription,
};

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Build from the loaded payment configuration.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self::new(SecretString::new(config.stripe_api_key.clone()))
            .with_base_url(config.api_base_url.clone())
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Sends an authenticated request and decodes a successful response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<T, PaymentError> {
        let response = request
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(operation, error = %e, "Stripe request failed");
                PaymentError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = map_stripe_error(status, &body);
            tracing::warn!(
                operation,
                status = status.as_u16(),
                code = %error.code,
                provider_code = error.provider_code.as_deref().unwrap_or("-"),
                "Stripe API error"
            );
            return Err(error);
        }

        response.json::<T>().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let params = payment_intent_params(&request);
        let intent: StripePaymentIntent = self
            .execute(
                self.http_client
                    .post(self.url("/v1/payment_intents"))
                    .form(&params),
                "create_payment_intent",
            )
            .await?;

        Ok(intent.into())
    }

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<PaymentIntent>, PaymentError> {
        let id = path_segment(payment_intent_id)?;
        let result: Result<StripePaymentIntent, PaymentError> = self
            .execute(
                self.http_client
                    .get(self.url(&format!("/v1/payment_intents/{}", id))),
                "retrieve_payment_intent",
            )
            .await;

        match result {
            Ok(intent) => Ok(Some(intent.into())),
            Err(e) if e.code == PaymentErrorCode::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, PaymentError> {
        let customers: StripeList<StripeCustomer> = self
            .execute(
                self.http_client
                    .get(self.url("/v1/customers"))
                    .query(&[("email", email), ("limit", "1")]),
                "find_customer_by_email",
            )
            .await?;

        Ok(customers
            .data
            .into_iter()
            .find(|customer| !customer.deleted)
            .map(Customer::from))
    }

    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let mut params = vec![("email".to_string(), request.email.clone())];
        params.extend(metadata_params(&request.metadata));

        let customer: StripeCustomer = self
            .execute(
                self.http_client.post(self.url("/v1/customers")).form(&params),
                "create_customer",
            )
            .await?;

        Ok(Customer {
            id: customer.id,
            email: customer.email.or(Some(request.email)),
        })
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, PaymentError> {
        let params = subscription_params(&request);
        let subscription: StripeSubscription = self
            .execute(
                self.http_client
                    .post(self.url("/v1/subscriptions"))
                    .form(&params),
                "create_subscription",
            )
            .await?;

        Ok(subscription.into())
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, PaymentError> {
        let id = path_segment(subscription_id)?;
        let subscription: StripeSubscription = self
            .execute(
                self.http_client
                    .delete(self.url(&format!("/v1/subscriptions/{}", id))),
                "cancel_subscription",
            )
            .await?;

        Ok(subscription.into())
    }
}

fn payment_intent_params(request: &CreatePaymentIntentRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("amount".to_string(), request.amount.minor_units().to_string()),
        ("currency".to_string(), request.currency.as_str().to_string()),
        ("description".to_string(), request.description.clone()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
    ];
    params.extend(metadata_params(&request.metadata));
    params
}

fn subscription_params(request: &CreateSubscriptionRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("customer".to_string(), request.customer_id.clone()),
        ("items[0][price]".to_string(), request.price_id.clone()),
        (
            "payment_behavior".to_string(),
            "default_incomplete".to_string(),
        ),
        (
            "payment_settings[save_default_payment_method]".to_string(),
            "on_subscription".to_string(),
        ),
        (
            "expand[]".to_string(),
            "latest_invoice.payment_intent".to_string(),
        ),
    ];
    params.extend(metadata_params(&request.metadata));
    params
}

fn metadata_params(metadata: &BTreeMap<String, String>) -> Vec<(String, String)> {
    metadata
        .iter()
        .map(|(key, value)| (format!("metadata[{}]", key), value.clone()))
        .collect()
}

/// Guards IDs interpolated into URL paths.
fn path_segment(id: &str) -> Result<&str, PaymentError> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PaymentError::invalid_request(format!(
            "Invalid identifier: {:?}",
            id
        )));
    }
    Ok(id)
}

/// Maps a non-2xx Stripe response onto a `PaymentError`.
fn map_stripe_error(status: StatusCode, body: &str) -> PaymentError {
    let api_error = serde_json::from_str::<StripeErrorBody>(body)
        .ok()
        .map(|body| body.error);

    let is_card_error = api_error
        .as_ref()
        .and_then(|e| e.error_type.as_deref())
        == Some("card_error");

    let code = match status {
        StatusCode::NOT_FOUND => PaymentErrorCode::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PaymentErrorCode::AuthenticationError,
        StatusCode::TOO_MANY_REQUESTS => PaymentErrorCode::RateLimitExceeded,
        StatusCode::PAYMENT_REQUIRED => PaymentErrorCode::CardDeclined,
        _ if is_card_error => PaymentErrorCode::CardDeclined,
        StatusCode::BAD_REQUEST => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let message = api_error
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| format!("Stripe API error (HTTP {})", status.as_u16()));

    let error = PaymentError::new(code, message);
    match api_error.and_then(|e| e.decline_code.or(e.code)) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}
