//! Errors returned by the checkout command and query handlers.

use thiserror::Error;

use crate::domain::payment::PaymentRequestError;
use crate::ports::PaymentError;

/// Why a checkout operation failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The request was rejected before reaching the provider.
    #[error(transparent)]
    InvalidRequest(#[from] PaymentRequestError),

    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] PaymentError),
}

impl CheckoutError {
    /// Human-readable message without the provider error code prefix.
    pub fn message(&self) -> String {
        match self {
            CheckoutError::InvalidRequest(err) => err.to_string(),
            CheckoutError::Provider(err) => err.message.clone(),
        }
    }
}
