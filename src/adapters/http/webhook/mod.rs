//! Stripe webhook HTTP endpoint.

mod handlers;
mod routes;

pub use handlers::{dispatch_response, WebhookAck, STRIPE_SIGNATURE_HEADER};
pub use routes::webhook_routes;
