//! Checkout request validation errors.

use thiserror::Error;

/// A checkout request that cannot be sent to the provider as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentRequestError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Amount is required")]
    MissingAmount,

    #[error("Amount must be at least {min} minor units, got {actual}")]
    AmountTooSmall { min: i64, actual: i64 },

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Price ID is required")]
    MissingPriceId,

    #[error("Subscription ID is required")]
    MissingSubscriptionId,

    #[error("Payment intent ID is required")]
    MissingPaymentIntentId,
}
