//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::payment::{
    CancelSubscriptionHandler, CreatePaymentIntentHandler, CreateSubscriptionHandler,
    GetPaymentStatusHandler,
};
use crate::domain::payment::{Currency, DEFAULT_PLACEHOLDER_EMAIL_DOMAIN};
use crate::domain::webhook::WebhookGateway;
use crate::ports::PaymentProvider;

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<WebhookGateway>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub default_currency: Currency,
    pub default_price_id: Option<String>,
    pub description_prefix: Option<String>,
    pub placeholder_email_domain: String,
}

impl AppState {
    pub fn new(
        gateway: Arc<WebhookGateway>,
        payment_provider: Arc<dyn PaymentProvider>,
        default_currency: Currency,
        default_price_id: Option<String>,
    ) -> Self {
        Self {
            gateway,
            payment_provider,
            default_currency,
            default_price_id,
            description_prefix: None,
            placeholder_email_domain: DEFAULT_PLACEHOLDER_EMAIL_DOMAIN.to_string(),
        }
    }

    pub fn with_description_prefix(mut self, prefix: Option<String>) -> Self {
        self.description_prefix = prefix;
        self
    }

    pub fn with_placeholder_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.placeholder_email_domain = domain.into();
        self
    }

    /// Create handlers on demand from the shared state.
    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(
            self.payment_provider.clone(),
            self.default_currency.clone(),
        )
        .with_description_prefix(self.description_prefix.clone())
    }

    pub fn get_payment_status_handler(&self) -> GetPaymentStatusHandler {
        GetPaymentStatusHandler::new(self.payment_provider.clone())
    }

    pub fn create_subscription_handler(&self) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(
            self.payment_provider.clone(),
            self.default_price_id.clone(),
        )
        .with_placeholder_email_domain(self.placeholder_email_domain.clone())
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.payment_provider.clone())
    }
}
