//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `webhook` - Signature verification and typed event dispatch
//! - `payment` - Checkout request value objects and validation

pub mod payment;
pub mod webhook;
