//! Checkout Gateway - Stripe webhook gateway and checkout API
//!
//! This crate verifies and dispatches Stripe webhook notifications to a typed
//! event handler, and exposes the checkout calls a web client needs: payment
//! intents, payment status and the subscription lifecycle.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
