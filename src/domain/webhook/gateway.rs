//! Webhook gateway - verifies inbound notifications and dispatches them.
//!
//! The gateway is the single entry point for Stripe webhooks:
//! 1. Verify the signature over the raw body
//! 2. Decode the generic event shape, then the typed payload
//! 3. Dispatch to exactly one handler method by event kind
//! 4. Emit exactly one log record describing the outcome
//!
//! Handler errors and panics are contained here and surface as
//! `DispatchResult::InternalError`, which the provider will retry.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::http::StatusCode;
use futures::future::BoxFuture;
use futures::FutureExt;
use secrecy::SecretString;

use super::envelope::WebhookEnvelope;
use super::errors::WebhookError;
use super::event::{EventKind, PaymentEvent};
use super::signature::{ReplayWindow, WebhookVerifier};
use crate::ports::{HandlerError, PaymentEventHandler};

/// Outcome of handling one notification.
#[derive(Debug)]
pub enum DispatchResult {
    /// The handler for a recognized kind completed.
    Acknowledged {
        event_id: Option<String>,
        kind: EventKind,
    },

    /// Authentic event of a kind nobody handles. Acknowledged so the
    /// provider stops redelivering it.
    Unhandled {
        event_id: Option<String>,
        kind: String,
    },

    /// Signature or decoding failure. No handler ran.
    Rejected(WebhookError),

    /// The handler failed or panicked.
    InternalError {
        event_id: Option<String>,
        kind: EventKind,
        error: WebhookError,
    },
}

impl DispatchResult {
    /// HTTP status returned to the provider.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchResult::Acknowledged { .. } | DispatchResult::Unhandled { .. } => {
                StatusCode::OK
            }
            DispatchResult::Rejected(error) | DispatchResult::InternalError { error, .. } => {
                error.status_code()
            }
        }
    }

    /// Outcome category used in logs and response bodies.
    pub fn outcome(&self) -> &'static str {
        match self {
            DispatchResult::Acknowledged { .. } => "acknowledged",
            DispatchResult::Unhandled { .. } => "unhandled",
            DispatchResult::Rejected(_) => "rejected",
            DispatchResult::InternalError { .. } => "internal_error",
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code().is_success()
    }

    /// The error behind a non-2xx outcome.
    pub fn error(&self) -> Option<&WebhookError> {
        match self {
            DispatchResult::Rejected(error) | DispatchResult::InternalError { error, .. } => {
                Some(error)
            }
            _ => None,
        }
    }
}

/// Verifies and dispatches Stripe webhook notifications.
///
/// Holds only immutable state and is shared across requests behind an `Arc`.
pub struct WebhookGateway {
    verifier: WebhookVerifier,
    handler: Arc<dyn PaymentEventHandler>,
}

impl WebhookGateway {
    pub fn new(
        webhook_secret: SecretString,
        window: ReplayWindow,
        handler: Arc<dyn PaymentEventHandler>,
    ) -> Self {
        Self {
            verifier: WebhookVerifier::new(webhook_secret, window),
            handler,
        }
    }

    /// Handles one notification against the current wall clock.
    pub async fn handle_notification(&self, envelope: WebhookEnvelope) -> DispatchResult {
        self.handle_notification_at(envelope, chrono::Utc::now().timestamp())
            .await
    }

    /// Handles one notification as if the current time were `now` (unix seconds).
    pub async fn handle_notification_at(
        &self,
        envelope: WebhookEnvelope,
        now: i64,
    ) -> DispatchResult {
        let result = self.process(envelope, now).await;
        log_outcome(&result);
        result
    }

    async fn process(&self, envelope: WebhookEnvelope, now: i64) -> DispatchResult {
        let verified = match self.verifier.verify_at(&envelope, now) {
            Ok(event) => event,
            Err(error) => return DispatchResult::Rejected(error),
        };

        let event_id = verified.id().map(str::to_owned);
        let event = match verified.into_payment_event() {
            Ok(event) => event,
            Err(error) => return DispatchResult::Rejected(error),
        };

        match self.dispatch(event).await {
            Dispatched::Unhandled(kind) => DispatchResult::Unhandled { event_id, kind },
            Dispatched::Handled(kind, Ok(())) => DispatchResult::Acknowledged { event_id, kind },
            Dispatched::Handled(kind, Err(error)) => DispatchResult::InternalError {
                event_id,
                kind,
                error: WebhookError::HandlerFailure(error),
            },
        }
    }

    /// Routes the event to the one handler method for its kind.
    async fn dispatch(&self, event: PaymentEvent) -> Dispatched {
        let handler = self.handler.as_ref();

        let (kind, invocation): (EventKind, BoxFuture<'_, Result<(), HandlerError>>) = match event
        {
            PaymentEvent::PaymentSucceeded(intent) => (
                EventKind::PaymentSucceeded,
                async move { handler.payment_succeeded(&intent).await }.boxed(),
            ),
            PaymentEvent::PaymentFailed(intent) => (
                EventKind::PaymentFailed,
                async move { handler.payment_failed(&intent).await }.boxed(),
            ),
            PaymentEvent::ChargeRefunded(charge) => (
                EventKind::ChargeRefunded,
                async move { handler.charge_refunded(&charge).await }.boxed(),
            ),
            PaymentEvent::CustomerCreated(customer) => (
                EventKind::CustomerCreated,
                async move { handler.customer_created(&customer).await }.boxed(),
            ),
            PaymentEvent::Unrecognized(kind) => return Dispatched::Unhandled(kind),
        };

        let result = AssertUnwindSafe(invocation)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::panicked(panic_message(panic.as_ref()))));

        Dispatched::Handled(kind, result)
    }
}

enum Dispatched {
    Handled(EventKind, Result<(), HandlerError>),
    Unhandled(String),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// The single log record for a handled notification.
fn log_outcome(result: &DispatchResult) {
    let outcome = result.outcome();
    match result {
        DispatchResult::Acknowledged { event_id, kind } => {
            tracing::info!(
                outcome,
                event_id = event_id.as_deref().unwrap_or("-"),
                event_type = %kind,
                "Webhook event handled"
            );
        }
        DispatchResult::Unhandled { event_id, kind } => {
            tracing::debug!(
                outcome,
                event_id = event_id.as_deref().unwrap_or("-"),
                event_type = %kind,
                "Webhook event type has no handler"
            );
        }
        DispatchResult::Rejected(error) => {
            tracing::warn!(
                outcome,
                error_code = error.code(),
                error = %error,
                "Webhook rejected"
            );
        }
        DispatchResult::InternalError {
            event_id,
            kind,
            error,
        } => {
            tracing::error!(
                outcome,
                event_id = event_id.as_deref().unwrap_or("-"),
                event_type = %kind,
                error = %error,
                "Webhook handler failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::signature::signature_header;
    use crate::domain::webhook::{
        ChargePayload, CustomerPayload, PaymentIntentPayload, SignatureError,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    const SECRET: &str = "whsec_gateway_test";
    const NOW: i64 = 1_704_067_200;

    #[derive(Clone, Copy, PartialEq)]
    enum Behaviour {
        Succeed,
        Fail,
        Panic,
    }

    /// Handler that counts calls per method and records intent ids.
    struct RecordingHandler {
        behaviour: Behaviour,
        succeeded: AtomicU32,
        failed: AtomicU32,
        refunded: AtomicU32,
        customers: AtomicU32,
        intents: Mutex<Vec<(String, i64)>>,
    }

    impl RecordingHandler {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                succeeded: AtomicU32::new(0),
                failed: AtomicU32::new(0),
                refunded: AtomicU32::new(0),
                customers: AtomicU32::new(0),
                intents: Mutex::new(Vec::new()),
            })
        }

        fn total_calls(&self) -> u32 {
            self.succeeded.load(Ordering::SeqCst)
                + self.failed.load(Ordering::SeqCst)
                + self.refunded.load(Ordering::SeqCst)
                + self.customers.load(Ordering::SeqCst)
        }

        fn outcome(&self) -> Result<(), HandlerError> {
            match self.behaviour {
                Behaviour::Succeed => Ok(()),
                Behaviour::Fail => Err(HandlerError::processing("ledger unavailable")),
                Behaviour::Panic => panic!("handler exploded"),
            }
        }
    }

    #[async_trait]
    impl PaymentEventHandler for RecordingHandler {
        async fn payment_succeeded(
            &self,
            intent: &PaymentIntentPayload,
        ) -> Result<(), HandlerError> {
            self.succeeded.fetch_add(1, Ordering::SeqCst);
            self.intents
                .lock()
                .unwrap()
                .push((intent.id.clone(), intent.amount));
            self.outcome()
        }

        async fn payment_failed(&self, _intent: &PaymentIntentPayload) -> Result<(), HandlerError> {
            self.failed.fetch_add(1, Ordering::SeqCst);
            self.outcome()
        }

        async fn charge_refunded(&self, _charge: &ChargePayload) -> Result<(), HandlerError> {
            self.refunded.fetch_add(1, Ordering::SeqCst);
            self.outcome()
        }

        async fn customer_created(&self, _customer: &CustomerPayload) -> Result<(), HandlerError> {
            self.customers.fetch_add(1, Ordering::SeqCst);
            self.outcome()
        }
    }

    fn gateway(handler: Arc<RecordingHandler>) -> WebhookGateway {
        WebhookGateway::new(
            SecretString::new(SECRET.to_string()),
            ReplayWindow::default(),
            handler,
        )
    }

    fn signed(body: serde_json::Value) -> WebhookEnvelope {
        let payload = body.to_string();
        let header = signature_header(SECRET, NOW, payload.as_bytes());
        WebhookEnvelope::new(payload.into_bytes(), header)
    }

    fn succeeded_body() -> serde_json::Value {
        json!({
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_123", "amount": 2500, "currency": "czk"}}
        })
    }

    // ══════════════════════════════════════════════════════════════
    // Scenario Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_payment_succeeded_is_acknowledged() {
        let handler = RecordingHandler::new(Behaviour::Succeed);

        let result = gateway(handler.clone())
            .handle_notification_at(signed(succeeded_body()), NOW)
            .await;

        assert!(matches!(
            result,
            DispatchResult::Acknowledged {
                kind: EventKind::PaymentSucceeded,
                ..
            }
        ));
        assert_eq!(result.status_code(), StatusCode::OK);
        assert_eq!(handler.succeeded.load(Ordering::SeqCst), 1);
        assert_eq!(handler.total_calls(), 1);
        assert_eq!(
            *handler.intents.lock().unwrap(),
            vec![("pi_123".to_string(), 2500)]
        );
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected_without_dispatch() {
        let handler = RecordingHandler::new(Behaviour::Succeed);
        let payload = succeeded_body().to_string();
        let envelope = WebhookEnvelope::new(
            payload.clone().into_bytes(),
            signature_header("whsec_wrong", NOW, payload.as_bytes()),
        );

        let result = gateway(handler.clone())
            .handle_notification_at(envelope, NOW)
            .await;

        assert!(matches!(
            result,
            DispatchResult::Rejected(WebhookError::SignatureInvalid(SignatureError::Mismatch))
        ));
        assert_eq!(result.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(handler.total_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_kind_is_unhandled() {
        let handler = RecordingHandler::new(Behaviour::Succeed);

        let result = gateway(handler.clone())
            .handle_notification_at(signed(json!({"type": "some.unknown.event"})), NOW)
            .await;

        match &result {
            DispatchResult::Unhandled { event_id, kind } => {
                assert_eq!(event_id, &None);
                assert_eq!(kind, "some.unknown.event");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(result.status_code(), StatusCode::OK);
        assert_eq!(handler.total_calls(), 0);
    }

    #[tokio::test]
    async fn handler_failure_is_internal_error() {
        let handler = RecordingHandler::new(Behaviour::Fail);

        let result = gateway(handler.clone())
            .handle_notification_at(signed(succeeded_body()), NOW)
            .await;

        assert!(matches!(
            result,
            DispatchResult::InternalError {
                error: WebhookError::HandlerFailure(HandlerError::Processing(_)),
                ..
            }
        ));
        assert_eq!(result.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(result.error().unwrap().is_retryable());
        assert_eq!(handler.succeeded.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_panic_is_contained() {
        let handler = RecordingHandler::new(Behaviour::Panic);

        let result = gateway(handler.clone())
            .handle_notification_at(signed(succeeded_body()), NOW)
            .await;

        match result {
            DispatchResult::InternalError {
                error: WebhookError::HandlerFailure(HandlerError::Panicked(message)),
                kind,
                event_id,
            } => {
                assert_eq!(message, "handler exploded");
                assert_eq!(kind, EventKind::PaymentSucceeded);
                assert_eq!(event_id.as_deref(), Some("evt_1"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Routing Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn each_kind_reaches_exactly_one_method() {
        let cases = [
            (
                json!({"type": "payment_intent.payment_failed",
                       "data": {"object": {"id": "pi_1", "amount": 100, "currency": "czk"}}}),
                EventKind::PaymentFailed,
            ),
            (
                json!({"type": "charge.refunded",
                       "data": {"object": {"id": "ch_1", "amount_refunded": 100}}}),
                EventKind::ChargeRefunded,
            ),
            (
                json!({"type": "customer.created",
                       "data": {"object": {"id": "cus_1"}}}),
                EventKind::CustomerCreated,
            ),
        ];

        for (body, expected_kind) in cases {
            let handler = RecordingHandler::new(Behaviour::Succeed);

            let result = gateway(handler.clone())
                .handle_notification_at(signed(body), NOW)
                .await;

            match result {
                DispatchResult::Acknowledged { kind, .. } => assert_eq!(kind, expected_kind),
                other => panic!("unexpected result: {:?}", other),
            }
            assert_eq!(handler.total_calls(), 1);
            let counter = match expected_kind {
                EventKind::PaymentSucceeded => &handler.succeeded,
                EventKind::PaymentFailed => &handler.failed,
                EventKind::ChargeRefunded => &handler.refunded,
                EventKind::CustomerCreated => &handler.customers,
            };
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn recognized_kind_with_bad_payload_is_rejected() {
        let handler = RecordingHandler::new(Behaviour::Succeed);
        let body = json!({"type": "payment_intent.succeeded", "data": {"object": {"id": "pi_1"}}});

        let result = gateway(handler.clone())
            .handle_notification_at(signed(body), NOW)
            .await;

        assert!(matches!(
            result,
            DispatchResult::Rejected(WebhookError::MalformedEvent(_))
        ));
        assert_eq!(result.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(handler.total_calls(), 0);
    }

    #[tokio::test]
    async fn stale_notification_is_rejected() {
        let handler = RecordingHandler::new(Behaviour::Succeed);

        let result = gateway(handler.clone())
            .handle_notification_at(signed(succeeded_body()), NOW + 301)
            .await;

        assert!(matches!(
            result,
            DispatchResult::Rejected(WebhookError::SignatureInvalid(
                SignatureError::TimestampTooOld { age_secs: 301 }
            ))
        ));
        assert_eq!(handler.total_calls(), 0);
    }

    #[tokio::test]
    async fn empty_header_is_rejected() {
        let handler = RecordingHandler::new(Behaviour::Succeed);
        let envelope = WebhookEnvelope::new(succeeded_body().to_string(), "");

        let result = gateway(handler.clone())
            .handle_notification_at(envelope, NOW)
            .await;

        assert!(matches!(
            result,
            DispatchResult::Rejected(WebhookError::SignatureInvalid(SignatureError::EmptyHeader))
        ));
        assert_eq!(result.outcome(), "rejected");
    }

    #[test]
    fn outcome_labels_and_statuses() {
        let acknowledged = DispatchResult::Acknowledged {
            event_id: None,
            kind: EventKind::CustomerCreated,
        };
        let unhandled = DispatchResult::Unhandled {
            event_id: None,
            kind: "invoice.paid".to_string(),
        };

        assert_eq!(acknowledged.outcome(), "acknowledged");
        assert_eq!(unhandled.outcome(), "unhandled");
        assert!(acknowledged.is_success());
        assert!(unhandled.is_success());
        assert!(acknowledged.error().is_none());
    }

    #[test]
    fn panic_message_handles_payload_types() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");

        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
