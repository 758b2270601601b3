//! Payment event handler port.
//!
//! The typed handler set the webhook gateway dispatches authenticated
//! events to. One method per recognized event kind, each receiving exactly
//! that kind's payload.
//!
//! Stripe delivers at least once, so implementations must make their
//! effects idempotent (keyed by intent, charge or customer id).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::webhook::{ChargePayload, CustomerPayload, PaymentIntentPayload};

/// Port for reacting to verified payment events.
#[async_trait]
pub trait PaymentEventHandler: Send + Sync {
    /// A payment intent completed successfully.
    async fn payment_succeeded(&self, intent: &PaymentIntentPayload) -> Result<(), HandlerError>;

    /// A payment attempt on an intent failed.
    async fn payment_failed(&self, intent: &PaymentIntentPayload) -> Result<(), HandlerError>;

    /// A charge was fully or partially refunded.
    async fn charge_refunded(&self, charge: &ChargePayload) -> Result<(), HandlerError>;

    /// A customer was created.
    async fn customer_created(&self, customer: &CustomerPayload) -> Result<(), HandlerError>;
}

/// Failure inside a payment event handler. Always retryable from the
/// provider's point of view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler ran but could not complete its work.
    #[error("Processing failed: {0}")]
    Processing(String),

    /// A dependency the handler needs is unavailable.
    #[error("Dependency unavailable: {0}")]
    Unavailable(String),

    /// The handler panicked; the panic was contained at the dispatch boundary.
    #[error("Handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    pub fn unavailable(dependency: impl Into<String>) -> Self {
        Self::Unavailable(dependency.into())
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked(message.into())
    }
}
