//! Mock payment provider for testing.
//!
//! Provides a configurable in-memory implementation of `PaymentProvider`
//! for unit and integration tests. Supports:
//! - Seeded customers, payment intents and subscriptions
//! - Error injection, globally or per method
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateSubscriptionRequest, Customer,
    PaymentError, PaymentIntent, PaymentProvider, Subscription, SubscriptionStatus,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Seed state
/// mock.add_customer(Customer { id: "cus_123".into(), email: Some("a@b.cz".into()) });
///
/// // Inject errors
/// mock.set_method_error("create_payment_intent", PaymentError::card_declined("Test decline"));
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    customers: HashMap<String, Customer>,
    payment_intents: HashMap<String, PaymentIntent>,
    subscriptions: HashMap<String, Subscription>,

    /// Sequence for generated IDs.
    next_id: u64,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

impl MockState {
    fn generate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_mock_{}", prefix, self.next_id)
    }
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a customer to the "database".
    pub fn add_customer(&self, customer: Customer) {
        let id = customer.id.clone();
        self.state().customers.insert(id, customer);
    }

    /// Add a payment intent to the "database".
    pub fn add_payment_intent(&self, intent: PaymentIntent) {
        let id = intent.id.clone();
        self.state().payment_intents.insert(id, intent);
    }

    /// Add a subscription to the "database".
    pub fn add_subscription(&self, subscription: Subscription) {
        let id = subscription.id.clone();
        self.state().subscriptions.insert(id, subscription);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Look up a stored subscription.
    pub fn subscription(&self, subscription_id: &str) -> Option<Subscription> {
        self.state().subscriptions.get(subscription_id).cloned()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        // Method-specific errors persist
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![
                request.amount.to_string(),
                request.currency.to_string(),
                request.description.clone(),
            ],
        );
        self.check_error("create_payment_intent")?;

        let mut state = self.state();
        let id = state.generate_id("pi");
        let intent = PaymentIntent {
            client_secret: Some(format!("{}_secret_mock", id)),
            id,
            status: "requires_payment_method".to_string(),
            amount: request.amount.minor_units(),
            currency: request.currency.to_string(),
        };
        state
            .payment_intents
            .insert(intent.id.clone(), intent.clone());

        Ok(intent)
    }

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<PaymentIntent>, PaymentError> {
        self.record_call(
            "retrieve_payment_intent",
            vec![payment_intent_id.to_string()],
        );
        self.check_error("retrieve_payment_intent")?;

        Ok(self.state().payment_intents.get(payment_intent_id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, PaymentError> {
        self.record_call("find_customer_by_email", vec![email.to_string()]);
        self.check_error("find_customer_by_email")?;

        let state = self.state();
        let mut matches: Vec<&Customer> = state
            .customers
            .values()
            .filter(|c| c.email.as_deref() == Some(email))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(matches.first().map(|c| (*c).clone()))
    }

    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record_call("create_customer", vec![request.email.clone()]);
        self.check_error("create_customer")?;

        let mut state = self.state();
        let customer = Customer {
            id: state.generate_id("cus"),
            email: Some(request.email),
        };
        state.customers.insert(customer.id.clone(), customer.clone());

        Ok(customer)
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, PaymentError> {
        self.record_call(
            "create_subscription",
            vec![request.customer_id.clone(), request.price_id.clone()],
        );
        self.check_error("create_subscription")?;

        let mut state = self.state();
        let id = state.generate_id("sub");
        let subscription = Subscription {
            client_secret: Some(format!("{}_secret_mock", id)),
            id,
            customer_id: request.customer_id,
            status: SubscriptionStatus::Incomplete,
            canceled_at: None,
        };
        state
            .subscriptions
            .insert(subscription.id.clone(), subscription.clone());

        Ok(subscription)
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, PaymentError> {
        self.record_call("cancel_subscription", vec![subscription_id.to_string()]);
        self.check_error("cancel_subscription")?;

        let mut state = self.state();
        let subscription = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;

        subscription.status = SubscriptionStatus::Canceled;
        subscription.canceled_at = Some(chrono::Utc::now().timestamp());

        Ok(subscription.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════════

impl MockPaymentProvider {
    /// Create a mock with a customer holding an active subscription.
    pub fn with_active_subscription(customer_id: &str, subscription_id: &str) -> Self {
        let mock = Self::new();

        mock.add_customer(Customer {
            id: customer_id.to_string(),
            email: Some("test@example.com".to_string()),
        });

        mock.add_subscription(Subscription {
            id: subscription_id.to_string(),
            customer_id: customer_id.to_string(),
            status: SubscriptionStatus::Active,
            client_secret: None,
            canceled_at: None,
        });

        mock
    }
}
