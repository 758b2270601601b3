//! Checkout HTTP endpoints.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::CheckoutApiError;
pub use routes::payment_routes;
