//! HTTP adapters - REST API implementations.
//!
//! - `webhook` - Stripe webhook endpoint (raw body, signature verified)
//! - `payment` - Checkout endpoints backed by the payment provider
//! - `health` - Liveness

pub mod error;
pub mod health;
pub mod payment;
pub mod router;
pub mod state;
pub mod webhook;

// Re-export key types for convenience
pub use error::ErrorResponse;
pub use router::build_router;
pub use state::AppState;
