//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::payment::DEFAULT_PLACEHOLDER_EMAIL_DOMAIN;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,

    /// Price used for subscriptions when the request does not name one
    pub stripe_price_id: Option<String>,

    /// Currency for payment intents that omit one
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Maximum accepted age of a webhook signature timestamp
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Accepted clock skew for webhook timestamps from the future
    #[serde(default = "default_webhook_clock_skew")]
    pub webhook_clock_skew_secs: i64,

    /// Base URL of the Stripe REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Brand prepended to payment intent descriptions
    pub description_prefix: Option<String>,

    /// Domain of placeholder emails for subscribers who give none
    #[serde(default = "default_placeholder_email_domain")]
    pub placeholder_email_domain: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if self.webhook_tolerance_secs <= 0 || self.webhook_clock_skew_secs < 0 {
            return Err(ValidationError::InvalidWebhookTolerance);
        }

        let currency = &self.default_currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency(currency.clone()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidApiBaseUrl);
        }

        let domain = &self.placeholder_email_domain;
        if domain.trim().is_empty() || domain.contains('@') || domain.contains(char::is_whitespace)
        {
            return Err(ValidationError::InvalidPlaceholderEmailDomain(domain.clone()));
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            stripe_price_id: None,
            default_currency: default_currency(),
            webhook_tolerance_secs: default_webhook_tolerance(),
            webhook_clock_skew_secs: default_webhook_clock_skew(),
            api_base_url: default_api_base_url(),
            description_prefix: None,
            placeholder_email_domain: default_placeholder_email_domain(),
        }
    }
}

fn default_currency() -> String {
    "czk".to_string()
}

fn default_webhook_tolerance() -> i64 {
    300
}

fn default_webhook_clock_skew() -> i64 {
    60
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_placeholder_email_domain() -> String {
    DEFAULT_PLACEHOLDER_EMAIL_DOMAIN.to_string()
}
