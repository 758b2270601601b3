//! HTTP handlers for checkout endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::payment::{CheckoutError, GetPaymentStatusQuery};
use crate::domain::payment::PaymentRequestError;
use crate::ports::PaymentErrorCode;

use super::super::error::ErrorResponse;
use super::super::state::AppState;
use super::dto::{
    CancelSubscriptionRequest, CancelSubscriptionResponse, CreatePaymentIntentRequest,
    CreateSubscriptionRequest, PaymentIntentResponse, PaymentStatusResponse,
    SubscriptionResponse,
};

/// POST /api/create-payment-intent
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let Json(request) = payload?;
    let result = state
        .create_payment_intent_handler()
        .handle(request.into())
        .await?;

    Ok(Json(PaymentIntentResponse::from(result)))
}

/// GET /api/payment-status/:payment_intent_id
pub async fn get_payment_status(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let intent = state
        .get_payment_status_handler()
        .handle(GetPaymentStatusQuery { payment_intent_id })
        .await?;

    Ok(Json(PaymentStatusResponse::from(intent)))
}

/// POST /api/create-subscription
pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let Json(request) = payload?;
    let result = state
        .create_subscription_handler()
        .handle(request.into())
        .await?;

    Ok(Json(SubscriptionResponse::from(result)))
}

/// POST /api/cancel-subscription
pub async fn cancel_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CancelSubscriptionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let Json(request) = payload?;
    let result = state
        .cancel_subscription_handler()
        .handle(request.into())
        .await?;

    Ok(Json(CancelSubscriptionResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts checkout errors to HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for CheckoutApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PaymentRequestError::MalformedBody(rejection.body_text()).into())
    }
}

impl CheckoutApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            CheckoutError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            CheckoutError::Provider(err) => match err.code {
                PaymentErrorCode::InvalidRequest => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
                PaymentErrorCode::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                PaymentErrorCode::CardDeclined => (StatusCode::PAYMENT_REQUIRED, "CARD_DECLINED"),
                PaymentErrorCode::NetworkError => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
                PaymentErrorCode::AuthenticationError
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderError => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            },
        }
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Payment provider call failed");
        }

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
    }
}
