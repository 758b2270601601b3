//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentEventHandler` - Reacts to verified webhook events (inbound)
//! - `PaymentProvider` - Payment intents, customers, subscriptions (outbound)

mod payment_event_handler;
mod payment_provider;

pub use payment_event_handler::{HandlerError, PaymentEventHandler};
pub use payment_provider::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateSubscriptionRequest, Customer,
    PaymentError, PaymentErrorCode, PaymentIntent, PaymentProvider, Subscription,
    SubscriptionStatus,
};
