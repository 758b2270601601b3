//! LoggingEventHandler - Default `PaymentEventHandler` that records events.
//!
//! Each verified payment event is written to the log with its salient
//! fields and acknowledged. Adopters replace this with handlers that
//! fulfil orders, update ledgers, send receipts and so on.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::webhook::{ChargePayload, CustomerPayload, PaymentIntentPayload};
use crate::ports::{HandlerError, PaymentEventHandler};

/// Handler that logs every event and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventHandler;

impl LoggingEventHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentEventHandler for LoggingEventHandler {
    async fn payment_succeeded(&self, intent: &PaymentIntentPayload) -> Result<(), HandlerError> {
        info!(
            payment_intent_id = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            customer = intent.customer.as_deref().unwrap_or("-"),
            metadata = ?intent.metadata,
            "Payment succeeded"
        );
        Ok(())
    }

    async fn payment_failed(&self, intent: &PaymentIntentPayload) -> Result<(), HandlerError> {
        let decline_code = intent
            .last_payment_error
            .as_ref()
            .and_then(|e| e.decline_code.as_deref());

        warn!(
            payment_intent_id = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            failure_message = intent.failure_message().unwrap_or("unknown"),
            decline_code = decline_code.unwrap_or("-"),
            "Payment failed"
        );
        Ok(())
    }

    async fn charge_refunded(&self, charge: &ChargePayload) -> Result<(), HandlerError> {
        info!(
            charge_id = %charge.id,
            payment_intent_id = charge.payment_intent.as_deref().unwrap_or("-"),
            amount_refunded = charge.amount_refunded,
            partial = charge.is_partial_refund(),
            "Charge refunded"
        );
        Ok(())
    }

    async fn customer_created(&self, customer: &CustomerPayload) -> Result<(), HandlerError> {
        info!(
            customer_id = %customer.id,
            email = customer.email.as_deref().unwrap_or("-"),
            "Customer created"
        );
        Ok(())
    }
}
