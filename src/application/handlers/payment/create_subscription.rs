//! CreateSubscriptionHandler - Command handler for starting subscriptions.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::payment::{
    CustomerEmail, PaymentRequestError, DEFAULT_PLACEHOLDER_EMAIL_DOMAIN, METADATA_SOURCE,
};
use crate::ports::{
    CreateCustomerRequest, CreateSubscriptionRequest, Customer, PaymentError, PaymentProvider,
    SubscriptionStatus,
};

use super::CheckoutError;

/// Command to start a subscription for a customer email.
#[derive(Debug, Clone, Default)]
pub struct CreateSubscriptionCommand {
    /// Price to subscribe to; falls back to the configured default.
    pub price_id: Option<String>,
    pub email: Option<String>,
}

/// Result of successful subscription creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubscriptionResult {
    pub subscription_id: String,
    pub customer_id: String,
    /// Client secret of the first invoice's payment intent.
    pub client_secret: String,
    pub status: SubscriptionStatus,
}

/// Handler for creating subscriptions.
///
/// The customer is looked up by email and created if absent. A request
/// without an email gets a placeholder address under the configured domain.
/// The subscription starts incomplete; the client confirms the first payment
/// with the returned client secret.
pub struct CreateSubscriptionHandler {
    provider: Arc<dyn PaymentProvider>,
    default_price_id: Option<String>,
    placeholder_email_domain: String,
}

impl CreateSubscriptionHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, default_price_id: Option<String>) -> Self {
        Self {
            provider,
            default_price_id,
            placeholder_email_domain: DEFAULT_PLACEHOLDER_EMAIL_DOMAIN.to_string(),
        }
    }

    pub fn with_placeholder_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.placeholder_email_domain = domain.into();
        self
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, CheckoutError> {
        // 1. Validate
        let price_id = non_blank(cmd.price_id.as_deref())
            .or_else(|| non_blank(self.default_price_id.as_deref()))
            .ok_or(PaymentRequestError::MissingPriceId)?
            .to_string();
        let email = match non_blank(cmd.email.as_deref()) {
            Some(raw) => CustomerEmail::parse(Some(raw))?,
            None => CustomerEmail::placeholder(
                &self.placeholder_email_domain,
                chrono::Utc::now().timestamp_millis(),
            ),
        };

        // 2. Find or create the customer
        let customer = self.find_or_create_customer(&email).await?;

        // 3. Create the subscription
        let subscription = self
            .provider
            .create_subscription(CreateSubscriptionRequest {
                customer_id: customer.id.clone(),
                price_id,
                metadata: source_metadata(),
            })
            .await?;

        let client_secret = subscription.client_secret.ok_or_else(|| {
            PaymentError::provider("Subscription has no payment intent client secret")
        })?;

        info!(
            subscription_id = %subscription.id,
            customer_id = %customer.id,
            status = %subscription.status,
            "Subscription created"
        );

        Ok(CreateSubscriptionResult {
            subscription_id: subscription.id,
            customer_id: customer.id,
            client_secret,
            status: subscription.status,
        })
    }

    async fn find_or_create_customer(
        &self,
        email: &CustomerEmail,
    ) -> Result<Customer, PaymentError> {
        if let Some(existing) = self.provider.find_customer_by_email(email.as_str()).await? {
            debug!(customer_id = %existing.id, "Reusing existing customer");
            return Ok(existing);
        }

        self.provider
            .create_customer(CreateCustomerRequest {
                email: email.as_str().to_string(),
                metadata: source_metadata(),
            })
            .await
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn source_metadata() -> BTreeMap<String, String> {
    BTreeMap::from([("source".to_string(), METADATA_SOURCE.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentErrorCode;

    fn handler(mock: &MockPaymentProvider, default_price: Option<&str>) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(Arc::new(mock.clone()), default_price.map(String::from))
    }

    fn command(price: Option<&str>, email: Option<&str>) -> CreateSubscriptionCommand {
        CreateSubscriptionCommand {
            price_id: price.map(String::from),
            email: email.map(String::from),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Customer Resolution Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn existing_customer_is_reused() {
        let mock = MockPaymentProvider::new();
        mock.add_customer(Customer {
            id: "cus_existing".to_string(),
            email: Some("jana@example.cz".to_string()),
        });

        let result = handler(&mock, None)
            .handle(command(Some("price_1"), Some("jana@example.cz")))
            .await
            .unwrap();

        assert_eq!(result.customer_id, "cus_existing");
        assert!(!mock.was_called("create_customer"));
        assert_eq!(result.status, SubscriptionStatus::Incomplete);
    }

    #[tokio::test]
    async fn missing_customer_is_created() {
        let mock = MockPaymentProvider::new();

        let result = handler(&mock, None)
            .handle(command(Some("price_1"), Some("petr@example.cz")))
            .await
            .unwrap();

        assert_eq!(mock.call_count("create_customer"), 1);
        assert!(result.customer_id.starts_with("cus_mock_"));
        assert!(!result.client_secret.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Price Resolution Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn falls_back_to_configured_price() {
        let mock = MockPaymentProvider::new();

        handler(&mock, Some("price_default"))
            .handle(command(None, Some("jana@example.cz")))
            .await
            .unwrap();

        let call = mock
            .calls()
            .into_iter()
            .find(|c| c.method == "create_subscription")
            .unwrap();
        assert_eq!(call.args[1], "price_default");
    }

    #[tokio::test]
    async fn missing_price_without_default_is_rejected() {
        let mock = MockPaymentProvider::new();

        let err = handler(&mock, None)
            .handle(command(None, Some("jana@example.cz")))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CheckoutError::InvalidRequest(PaymentRequestError::MissingPriceId)
        );
        assert!(mock.calls().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Email Resolution Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_email_creates_placeholder_customer() {
        let mock = MockPaymentProvider::new();

        let result = handler(&mock, Some("price_default"))
            .with_placeholder_email_domain("shop.example")
            .handle(command(None, None))
            .await
            .unwrap();

        assert!(result.customer_id.starts_with("cus_mock_"));
        let created = mock
            .calls()
            .into_iter()
            .find(|c| c.method == "create_customer")
            .unwrap();
        let email = &created.args[0];
        assert!(email.starts_with("customer_"));
        assert!(email.ends_with("@shop.example"));
    }

    #[tokio::test]
    async fn blank_email_uses_default_placeholder_domain() {
        let mock = MockPaymentProvider::new();

        handler(&mock, Some("price_default"))
            .handle(command(None, Some("   ")))
            .await
            .unwrap();

        let lookup = mock
            .calls()
            .into_iter()
            .find(|c| c.method == "find_customer_by_email")
            .unwrap();
        assert!(lookup.args[0].ends_with(&format!("@{}", DEFAULT_PLACEHOLDER_EMAIL_DOMAIN)));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let mock = MockPaymentProvider::new();

        let err = handler(&mock, Some("price_default"))
            .handle(command(None, Some("jana.example.cz")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InvalidRequest(PaymentRequestError::InvalidEmail(_))
        ));
        assert!(mock.calls().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Provider Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn subscription_without_client_secret_is_provider_error() {
        let mock = MockPaymentProvider::new();

        struct NoSecret(MockPaymentProvider);

        #[async_trait::async_trait]
        impl PaymentProvider for NoSecret {
            async fn create_payment_intent(
                &self,
                request: crate::ports::CreatePaymentIntentRequest,
            ) -> Result<crate::ports::PaymentIntent, PaymentError> {
                self.0.create_payment_intent(request).await
            }
            async fn retrieve_payment_intent(
                &self,
                id: &str,
            ) -> Result<Option<crate::ports::PaymentIntent>, PaymentError> {
                self.0.retrieve_payment_intent(id).await
            }
            async fn find_customer_by_email(
                &self,
                email: &str,
            ) -> Result<Option<Customer>, PaymentError> {
                self.0.find_customer_by_email(email).await
            }
            async fn create_customer(
                &self,
                request: CreateCustomerRequest,
            ) -> Result<Customer, PaymentError> {
                self.0.create_customer(request).await
            }
            async fn create_subscription(
                &self,
                request: CreateSubscriptionRequest,
            ) -> Result<crate::ports::Subscription, PaymentError> {
                let mut sub = self.0.create_subscription(request).await?;
                sub.client_secret = None;
                Ok(sub)
            }
            async fn cancel_subscription(
                &self,
                id: &str,
            ) -> Result<crate::ports::Subscription, PaymentError> {
                self.0.cancel_subscription(id).await
            }
        }

        let err = CreateSubscriptionHandler::new(Arc::new(NoSecret(mock)), None)
            .handle(command(Some("price_1"), Some("jana@example.cz")))
            .await
            .unwrap_err();

        match err {
            CheckoutError::Provider(e) => assert_eq!(e.code, PaymentErrorCode::ProviderError),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn customer_lookup_failure_stops_the_flow() {
        let mock = MockPaymentProvider::new();
        mock.set_method_error("find_customer_by_email", PaymentError::network("timeout"));

        let err = handler(&mock, None)
            .handle(command(Some("price_1"), Some("jana@example.cz")))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Provider(_)));
        assert!(!mock.was_called("create_subscription"));
    }
}
