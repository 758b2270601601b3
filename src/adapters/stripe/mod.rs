//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration:
//! - Payment intents
//! - Customer lookup and creation
//! - Subscription creation and cancellation
//!
//! Webhook verification lives in the domain (`domain::webhook`); this
//! module only makes outbound API calls.

mod mock_payment_provider;
mod stripe_adapter;
mod stripe_types;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use stripe_types::{
    Expandable, StripeApiError, StripeCustomer, StripeInvoice, StripePaymentIntent,
    StripeSubscription,
};
