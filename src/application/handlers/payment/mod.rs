//! Payment handlers - Checkout commands and queries.
//!
//! Commands:
//! - `CreatePaymentIntentHandler` - One-off payment intent
//! - `CreateSubscriptionHandler` - Find-or-create customer, start subscription
//! - `CancelSubscriptionHandler` - Immediate cancellation
//!
//! Queries:
//! - `GetPaymentStatusHandler` - Current payment intent state

mod cancel_subscription;
mod create_payment_intent;
mod create_subscription;
mod errors;
mod get_payment_status;

pub use cancel_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
};
pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
};
pub use create_subscription::{
    CreateSubscriptionCommand, CreateSubscriptionHandler, CreateSubscriptionResult,
};
pub use errors::CheckoutError;
pub use get_payment_status::{GetPaymentStatusHandler, GetPaymentStatusQuery};
