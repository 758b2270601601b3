//! Authenticated webhook events and their typed payloads.
//!
//! A [`VerifiedEvent`] can only be produced by the signature verifier, so
//! holding one proves the body passed HMAC verification. Decoding it into
//! a [`PaymentEvent`] classifies the event into the closed set of kinds
//! the gateway dispatches.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::errors::WebhookError;

/// Generic event shape. Only `type` is mandatory.
#[derive(Debug, Deserialize)]
struct RawEvent {
    id: Option<String>,
    #[serde(rename = "type")]
    event_type: String,
    created: Option<i64>,
    #[serde(default)]
    livemode: bool,
    data: Option<RawEventData>,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    #[serde(default)]
    object: Value,
}

/// A webhook event whose signature has been verified.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedEvent {
    id: Option<String>,
    event_type: String,
    created: Option<i64>,
    livemode: bool,
    object: Value,
}

impl VerifiedEvent {
    /// Decodes the generic event shape from an authenticated body.
    pub(super) fn from_verified_body(body: &[u8]) -> Result<Self, WebhookError> {
        let raw: RawEvent = serde_json::from_slice(body)
            .map_err(|e| WebhookError::MalformedEvent(e.to_string()))?;

        Ok(Self {
            id: raw.id,
            event_type: raw.event_type,
            created: raw.created,
            livemode: raw.livemode,
            object: raw.data.map(|data| data.object).unwrap_or(Value::Null),
        })
    }

    /// Event identifier (`evt_...`), when present.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Raw event type string, e.g. `payment_intent.succeeded`.
    pub fn kind(&self) -> &str {
        &self.event_type
    }

    pub fn created(&self) -> Option<i64> {
        self.created
    }

    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// The `data.object` value, or `Null` when absent.
    pub fn object(&self) -> &Value {
        &self.object
    }

    /// Classifies the event and decodes its typed payload.
    ///
    /// Unrecognized kinds never fail. A recognized kind whose `data.object`
    /// is missing or has the wrong shape is a `MalformedEvent`.
    pub fn into_payment_event(self) -> Result<PaymentEvent, WebhookError> {
        let Some(kind) = EventKind::from_type(&self.event_type) else {
            return Ok(PaymentEvent::Unrecognized(self.event_type));
        };

        let event = match kind {
            EventKind::PaymentSucceeded => {
                PaymentEvent::PaymentSucceeded(decode_object(kind, self.object)?)
            }
            EventKind::PaymentFailed => {
                PaymentEvent::PaymentFailed(decode_object(kind, self.object)?)
            }
            EventKind::ChargeRefunded => {
                PaymentEvent::ChargeRefunded(decode_object(kind, self.object)?)
            }
            EventKind::CustomerCreated => {
                PaymentEvent::CustomerCreated(decode_object(kind, self.object)?)
            }
        };
        Ok(event)
    }
}

fn decode_object<T: DeserializeOwned>(kind: EventKind, object: Value) -> Result<T, WebhookError> {
    if object.is_null() {
        return Err(WebhookError::MalformedEvent(format!(
            "{} event has no data.object",
            kind
        )));
    }
    serde_json::from_value(object)
        .map_err(|e| WebhookError::MalformedEvent(format!("invalid {} payload: {}", kind, e)))
}

/// Event kinds the gateway dispatches to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// payment_intent.succeeded
    PaymentSucceeded,
    /// payment_intent.payment_failed
    PaymentFailed,
    /// charge.refunded
    ChargeRefunded,
    /// customer.created
    CustomerCreated,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::PaymentSucceeded,
        EventKind::PaymentFailed,
        EventKind::ChargeRefunded,
        EventKind::CustomerCreated,
    ];

    /// Parse from the Stripe event type string. Matching is exact.
    pub fn from_type(s: &str) -> Option<Self> {
        match s {
            "payment_intent.succeeded" => Some(Self::PaymentSucceeded),
            "payment_intent.payment_failed" => Some(Self::PaymentFailed),
            "charge.refunded" => Some(Self::ChargeRefunded),
            "customer.created" => Some(Self::CustomerCreated),
            _ => None,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentSucceeded => "payment_intent.succeeded",
            Self::PaymentFailed => "payment_intent.payment_failed",
            Self::ChargeRefunded => "charge.refunded",
            Self::CustomerCreated => "customer.created",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified event classified into the closed set of handled kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentEvent {
    PaymentSucceeded(PaymentIntentPayload),
    PaymentFailed(PaymentIntentPayload),
    ChargeRefunded(ChargePayload),
    CustomerCreated(CustomerPayload),
    /// Any other event type, carried verbatim.
    Unrecognized(String),
}

impl PaymentEvent {
    /// The dispatched kind, or `None` for unrecognized events.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            PaymentEvent::PaymentSucceeded(_) => Some(EventKind::PaymentSucceeded),
            PaymentEvent::PaymentFailed(_) => Some(EventKind::PaymentFailed),
            PaymentEvent::ChargeRefunded(_) => Some(EventKind::ChargeRefunded),
            PaymentEvent::CustomerCreated(_) => Some(EventKind::CustomerCreated),
            PaymentEvent::Unrecognized(_) => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payloads
// ════════════════════════════════════════════════════════════════════════════════

/// Payment intent object carried by `payment_intent.*` events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntentPayload {
    /// Payment intent ID (pi_...).
    pub id: String,

    /// Amount in the smallest currency unit.
    pub amount: i64,

    /// Lowercase ISO currency code.
    pub currency: String,

    pub status: Option<String>,

    /// Customer ID (cus_...), if attached.
    pub customer: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Decline details on failed payments.
    pub last_payment_error: Option<PaymentErrorDetails>,
}

impl PaymentIntentPayload {
    /// Human-readable failure reason, if Stripe supplied one.
    pub fn failure_message(&self) -> Option<&str> {
        self.last_payment_error
            .as_ref()
            .and_then(|e| e.message.as_deref().or(e.code.as_deref()))
    }
}

/// Stripe `last_payment_error` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentErrorDetails {
    pub code: Option<String>,
    pub decline_code: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

/// Charge object carried by `charge.refunded`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChargePayload {
    /// Charge ID (ch_...).
    pub id: String,

    pub amount: Option<i64>,

    /// Total refunded so far, in the smallest currency unit.
    pub amount_refunded: i64,

    pub currency: Option<String>,

    /// Payment intent the charge belongs to.
    pub payment_intent: Option<String>,

    /// True once the charge is fully refunded.
    #[serde(default)]
    pub refunded: bool,
}

impl ChargePayload {
    pub fn is_partial_refund(&self) -> bool {
        !self.refunded && self.amount_refunded > 0
    }
}

/// Customer object carried by `customer.created`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerPayload {
    /// Customer ID (cus_...).
    pub id: String,

    pub email: Option<String>,

    pub name: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}
