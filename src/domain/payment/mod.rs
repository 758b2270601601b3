//! Payment domain module.
//!
//! Value objects that validate checkout requests before they reach Stripe.

mod amount;
mod currency;
mod customer_email;
mod errors;

pub use amount::Amount;
pub use currency::Currency;
pub use customer_email::CustomerEmail;
pub use errors::PaymentRequestError;

/// Metadata `source` stamped on every object this service creates.
pub const METADATA_SOURCE: &str = "checkout-gateway";

/// Product recorded on payment intents that do not name one.
pub const DEFAULT_PRODUCT_ID: &str = "web-standard";

/// Description used for payment intents that do not supply one.
pub const DEFAULT_DESCRIPTION: &str = "Payment for services";

/// Domain of placeholder addresses for subscribers who give no email.
pub const DEFAULT_PLACEHOLDER_EMAIL_DOMAIN: &str = "example.com";
