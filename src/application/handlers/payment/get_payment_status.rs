//! GetPaymentStatusHandler - Query handler for payment intent status.

use std::sync::Arc;

use crate::domain::payment::PaymentRequestError;
use crate::ports::{PaymentError, PaymentIntent, PaymentProvider};

use super::CheckoutError;

/// Query for the current state of a payment intent.
#[derive(Debug, Clone)]
pub struct GetPaymentStatusQuery {
    pub payment_intent_id: String,
}

/// Handler for payment status queries.
pub struct GetPaymentStatusHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl GetPaymentStatusHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, query: GetPaymentStatusQuery) -> Result<PaymentIntent, CheckoutError> {
        let id = query.payment_intent_id.trim();
        if id.is_empty() {
            return Err(PaymentRequestError::MissingPaymentIntentId.into());
        }

        self.provider
            .retrieve_payment_intent(id)
            .await?
            .ok_or_else(|| PaymentError::not_found("Payment intent").into())
    }
}
