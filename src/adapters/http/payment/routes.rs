//! Axum router configuration for checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    cancel_subscription, create_payment_intent, create_subscription, get_payment_status,
};

/// Create the checkout API router, mounted under `/api`.
///
/// # Routes
/// - `POST /create-payment-intent` - One-off payment intent
/// - `GET /payment-status/:payment_intent_id` - Payment intent status
/// - `POST /create-subscription` - Start a subscription
/// - `POST /cancel-subscription` - Cancel a subscription immediately
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route(
            "/payment-status/:payment_intent_id",
            get(get_payment_status),
        )
        .route("/create-subscription", post(create_subscription))
        .route("/cancel-subscription", post(cancel_subscription))
}
