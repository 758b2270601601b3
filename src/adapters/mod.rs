//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Payment event handlers (logging)
//! - `http` - Axum routes, DTOs and middleware
//! - `stripe` - Stripe REST API client and a mock provider

pub mod events;
pub mod http;
pub mod stripe;

pub use events::LoggingEventHandler;
pub use http::{build_router, AppState};
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
