//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod payment;

pub use payment::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
    CheckoutError, CreatePaymentIntentCommand, CreatePaymentIntentHandler,
    CreatePaymentIntentResult, CreateSubscriptionCommand, CreateSubscriptionHandler,
    CreateSubscriptionResult, GetPaymentStatusHandler, GetPaymentStatusQuery,
};
