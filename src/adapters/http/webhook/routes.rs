//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::super::state::AppState;
use super::handlers::handle_stripe_webhook;

/// Create the webhook router, mounted under `/api/webhooks`.
///
/// Webhooks carry no user authentication; they are verified by signature.
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}
