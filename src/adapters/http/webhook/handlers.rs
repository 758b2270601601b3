//! HTTP handler for the Stripe webhook endpoint.
//!
//! The body is taken as raw bytes: the signature covers the exact payload,
//! so it must never pass through a JSON extractor first.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::domain::webhook::{DispatchResult, WebhookEnvelope};

use super::super::error::ErrorResponse;
use super::super::state::AppState;

/// Header carrying `t=<unix>,v1=<hex>` signatures.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// Body returned for acknowledged and unhandled events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    pub outcome: String,
}

/// POST /api/webhooks/stripe
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Missing or non-ASCII header is verified as empty and rejected there
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let envelope = WebhookEnvelope::new(body.to_vec(), signature);
    let result = state.gateway.handle_notification(envelope).await;

    dispatch_response(&result)
}

/// Translate a dispatch outcome into a status code and small JSON body.
pub fn dispatch_response(result: &DispatchResult) -> Response {
    let status = result.status_code();

    match result.error() {
        Some(error) => {
            let body = ErrorResponse::new(error.code(), error.to_string());
            (status, Json(body)).into_response()
        }
        None => {
            let body = WebhookAck {
                received: true,
                outcome: result.outcome().to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}
