//! CreatePaymentIntentHandler - Command handler for one-off payments.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::payment::{
    Amount, Currency, PaymentRequestError, DEFAULT_DESCRIPTION, DEFAULT_PRODUCT_ID,
    METADATA_SOURCE,
};
use crate::ports::{CreatePaymentIntentRequest, PaymentError, PaymentProvider};

use super::CheckoutError;

/// Command to create a payment intent.
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentIntentCommand {
    /// Amount in minor units.
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub product_id: Option<String>,
}

/// Result of successful payment intent creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentIntentResult {
    pub payment_intent_id: String,
    pub client_secret: String,
}

/// Handler for creating payment intents.
///
/// Validates the amount and currency, fills in the default description and
/// product, and stamps the `source` metadata before calling the provider.
/// An optional prefix brands every description sent to the provider.
pub struct CreatePaymentIntentHandler {
    provider: Arc<dyn PaymentProvider>,
    default_currency: Currency,
    description_prefix: Option<String>,
}

impl CreatePaymentIntentHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, default_currency: Currency) -> Self {
        Self {
            provider,
            default_currency,
            description_prefix: None,
        }
    }

    pub fn with_description_prefix(mut self, prefix: Option<String>) -> Self {
        self.description_prefix = prefix;
        self
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, CheckoutError> {
        // 1. Validate
        let amount = Amount::try_new(cmd.amount.ok_or(PaymentRequestError::MissingAmount)?)?;
        let currency = match non_blank(cmd.currency.as_deref()) {
            Some(code) => Currency::parse(code)?,
            None => self.default_currency.clone(),
        };

        // 2. Defaults and metadata
        let description = non_blank(cmd.description.as_deref()).unwrap_or(DEFAULT_DESCRIPTION);
        let description = match non_blank(self.description_prefix.as_deref()) {
            Some(prefix) => format!("{} - {}", prefix, description),
            None => description.to_string(),
        };
        let product = non_blank(cmd.product_id.as_deref()).unwrap_or(DEFAULT_PRODUCT_ID);

        let metadata = BTreeMap::from([
            ("source".to_string(), METADATA_SOURCE.to_string()),
            ("product".to_string(), product.to_string()),
        ]);

        // 3. Create with the provider
        let intent = self
            .provider
            .create_payment_intent(CreatePaymentIntentRequest {
                amount,
                currency,
                description,
                metadata,
            })
            .await?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| PaymentError::provider("Payment intent has no client secret"))?;

        info!(
            payment_intent_id = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            "Payment intent created"
        );

        Ok(CreatePaymentIntentResult {
            payment_intent_id: intent.id,
            client_secret,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentErrorCode;

    fn handler(mock: &MockPaymentProvider) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(
            Arc::new(mock.clone()),
            Currency::parse("czk").unwrap(),
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_intent_with_defaults() {
        let mock = MockPaymentProvider::new();

        let result = handler(&mock)
            .handle(CreatePaymentIntentCommand {
                amount: Some(2500),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(result.payment_intent_id.starts_with("pi_mock_"));
        assert!(!result.client_secret.is_empty());

        let call = &mock.calls()[0];
        assert_eq!(call.method, "create_payment_intent");
        assert_eq!(call.args, vec!["2500", "czk", DEFAULT_DESCRIPTION]);
    }

    #[tokio::test]
    async fn currency_is_lowercased_and_description_kept() {
        let mock = MockPaymentProvider::new();

        handler(&mock)
            .handle(CreatePaymentIntentCommand {
                amount: Some(100),
                currency: Some("EUR".to_string()),
                description: Some("Consultation".to_string()),
                product_id: Some("pro".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(mock.calls()[0].args, vec!["100", "eur", "Consultation"]);
    }

    #[tokio::test]
    async fn blank_optional_fields_fall_back_to_defaults() {
        let mock = MockPaymentProvider::new();

        handler(&mock)
            .handle(CreatePaymentIntentCommand {
                amount: Some(100),
                currency: Some("  ".to_string()),
                description: Some(String::new()),
                product_id: None,
            })
            .await
            .unwrap();

        assert_eq!(mock.calls()[0].args, vec!["100", "czk", DEFAULT_DESCRIPTION]);
    }

    #[tokio::test]
    async fn description_prefix_brands_provider_description() {
        let mock = MockPaymentProvider::new();

        handler(&mock)
            .with_description_prefix(Some("Acme Shop".to_string()))
            .handle(CreatePaymentIntentCommand {
                amount: Some(100),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            mock.calls()[0].args[2],
            format!("Acme Shop - {}", DEFAULT_DESCRIPTION)
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn amount_below_minimum_is_rejected_without_provider_call() {
        let mock = MockPaymentProvider::new();

        let err = handler(&mock)
            .handle(CreatePaymentIntentCommand {
                amount: Some(99),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InvalidRequest(PaymentRequestError::AmountTooSmall { .. })
        ));
        assert!(!mock.was_called("create_payment_intent"));
    }

    #[tokio::test]
    async fn missing_amount_is_rejected_without_provider_call() {
        let mock = MockPaymentProvider::new();

        let err = handler(&mock)
            .handle(CreatePaymentIntentCommand {
                currency: Some("czk".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::InvalidRequest(PaymentRequestError::MissingAmount));
        assert!(!mock.was_called("create_payment_intent"));
    }

    #[tokio::test]
    async fn invalid_currency_is_rejected() {
        let mock = MockPaymentProvider::new();

        let err = handler(&mock)
            .handle(CreatePaymentIntentCommand {
                amount: Some(500),
                currency: Some("euro".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CheckoutError::InvalidRequest(PaymentRequestError::InvalidCurrency("euro".into()))
        );
    }

    #[tokio::test]
    async fn provider_error_is_propagated() {
        let mock = MockPaymentProvider::new();
        mock.set_error(PaymentError::card_declined("Your card was declined."));

        let err = handler(&mock)
            .handle(CreatePaymentIntentCommand {
                amount: Some(500),
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            CheckoutError::Provider(e) => assert_eq!(e.code, PaymentErrorCode::CardDeclined),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
