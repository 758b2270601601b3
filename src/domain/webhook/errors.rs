//! Webhook error types for Stripe webhook handling.
//!
//! Defines every way an inbound notification can fail, with HTTP status
//! mapping and retryability semantics. Status codes drive the provider's
//! redelivery: 2xx acknowledges, 4xx is terminal, 5xx is retried later.

use axum::http::StatusCode;
use thiserror::Error;

use crate::ports::HandlerError;

/// Reasons a `Stripe-Signature` header fails verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Header is empty or missing.
    #[error("signature header is empty")]
    EmptyHeader,

    /// A header element is not a `key=value` pair.
    #[error("malformed signature header element: {0}")]
    MalformedHeader(String),

    /// Missing timestamp component (t=...).
    #[error("missing timestamp (t=) in signature header")]
    MissingTimestamp,

    /// Missing v1 signature component.
    #[error("missing v1 signature in signature header")]
    MissingV1Signature,

    /// Timestamp is not an integer.
    #[error("invalid timestamp format")]
    InvalidTimestamp,

    /// Signature is not valid hex.
    #[error("invalid signature format (not valid hex)")]
    InvalidSignatureFormat,

    /// Timestamp is older than the tolerance window (possible replay).
    #[error("timestamp too old ({age_secs} seconds)")]
    TimestampTooOld { age_secs: i64 },

    /// Timestamp lies further in the future than the allowed clock skew.
    #[error("timestamp {skew_secs} seconds in the future")]
    TimestampInFuture { skew_secs: i64 },

    /// No v1 signature matches the expected HMAC.
    #[error("no signature matches the expected signature")]
    Mismatch,
}

/// Errors that occur while handling a webhook notification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature verification failed. Terminal: never retried.
    #[error("Invalid signature: {0}")]
    SignatureInvalid(#[from] SignatureError),

    /// Signature was valid but the body could not be decoded.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// An authenticated event failed inside its handler.
    #[error("Handler failure: {0}")]
    HandlerFailure(#[from] HandlerError),
}

impl WebhookError {
    /// Returns true if the provider should redeliver this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::HandlerFailure(_))
    }

    /// Maps the error to the HTTP status returned to the provider.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SignatureInvalid(_) | WebhookError::MalformedEvent(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::HandlerFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::SignatureInvalid(_) => "SIGNATURE_INVALID",
            WebhookError::MalformedEvent(_) => "MALFORMED_EVENT",
            WebhookError::HandlerFailure(_) => "HANDLER_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Display
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn signature_invalid_displays_reason() {
        let err = WebhookError::from(SignatureError::TimestampTooOld { age_secs: 301 });
        assert_eq!(
            err.to_string(),
            "Invalid signature: timestamp too old (301 seconds)"
        );
    }

    #[test]
    fn malformed_event_displays_message() {
        let err = WebhookError::MalformedEvent("missing type".to_string());
        assert_eq!(err.to_string(), "Malformed event: missing type");
    }

    #[test]
    fn handler_failure_displays_inner_error() {
        let err = WebhookError::from(HandlerError::processing("order store offline"));
        assert_eq!(
            err.to_string(),
            "Handler failure: Processing failed: order store offline"
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Retryability
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn only_handler_failure_is_retryable() {
        assert!(WebhookError::from(HandlerError::unavailable("db")).is_retryable());
        assert!(!WebhookError::from(SignatureError::Mismatch).is_retryable());
        assert!(!WebhookError::MalformedEvent("x".to_string()).is_retryable());
    }

    // ══════════════════════════════════════════════════════════════
    // Status codes
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn signature_invalid_returns_bad_request() {
        let err = WebhookError::from(SignatureError::Mismatch);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "SIGNATURE_INVALID");
    }

    #[test]
    fn malformed_event_returns_bad_request() {
        let err = WebhookError::MalformedEvent("bad json".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "MALFORMED_EVENT");
    }

    #[test]
    fn handler_failure_status_differs_from_signature_invalid() {
        let handler = WebhookError::from(HandlerError::processing("boom"));
        let signature = WebhookError::from(SignatureError::Mismatch);

        assert_eq!(handler.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(handler.status_code(), signature.status_code());
        assert!(handler.status_code().is_server_error());
        assert!(signature.status_code().is_client_error());
    }
}
