//! Webhook domain module.
//!
//! Authenticates Stripe notifications and dispatches them to typed handlers.
//!
//! # Module Structure
//!
//! - `envelope` - Raw body plus signature header, as received
//! - `signature` - Header parsing, replay window, HMAC verification
//! - `event` - Verified events, event kinds and typed payloads
//! - `errors` - Rejection and failure taxonomy with status mapping
//! - `gateway` - Verification and dispatch entry point

mod envelope;
mod errors;
mod event;
mod gateway;
mod signature;

pub use envelope::WebhookEnvelope;
pub use errors::{SignatureError, WebhookError};
pub use event::{
    ChargePayload, CustomerPayload, EventKind, PaymentErrorDetails, PaymentEvent,
    PaymentIntentPayload, VerifiedEvent,
};
pub use gateway::{DispatchResult, WebhookGateway};
pub use signature::{
    signature_header, ReplayWindow, SignatureHeader, WebhookVerifier, DEFAULT_CLOCK_SKEW_SECS,
    DEFAULT_TOLERANCE_SECS,
};
