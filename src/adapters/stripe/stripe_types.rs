//! Stripe REST API response types.
//!
//! These mirror the JSON Stripe returns for the objects this service
//! creates and reads. Only the fields we map into port types are captured;
//! everything else is ignored.

use serde::Deserialize;

use crate::ports::{Customer, PaymentIntent, Subscription, SubscriptionStatus};

/// A field Stripe returns either as an ID or, when requested via
/// `expand[]`, as the full object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(Box<T>),
}

impl<T> Expandable<T> {
    /// The expanded object, if Stripe returned one.
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Object(object) => Some(object),
            Expandable::Id(_) => None,
        }
    }
}

/// Stripe list envelope (`{"object":"list","data":[...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
}

/// Stripe PaymentIntent object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    /// Payment intent ID (pi_...).
    pub id: String,

    pub client_secret: Option<String>,

    pub status: String,

    pub amount: i64,

    pub currency: String,
}

impl From<StripePaymentIntent> for PaymentIntent {
    fn from(intent: StripePaymentIntent) -> Self {
        PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
        }
    }
}

/// Stripe Customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    /// Customer ID (cus_...).
    pub id: String,

    pub email: Option<String>,

    /// Present and true on deleted customers.
    #[serde(default)]
    pub deleted: bool,
}

impl From<StripeCustomer> for Customer {
    fn from(customer: StripeCustomer) -> Self {
        Customer {
            id: customer.id,
            email: customer.email,
        }
    }
}

/// Stripe Invoice object (only as embedded in a subscription).
#[derive(Debug, Clone, Deserialize)]
pub struct StripeInvoice {
    /// Invoice ID (in_...).
    pub id: String,

    pub payment_intent: Option<Expandable<StripePaymentIntent>>,
}

/// Stripe Subscription object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscription {
    /// Subscription ID (sub_...).
    pub id: String,

    /// Customer ID.
    pub customer: String,

    pub status: SubscriptionStatus,

    /// When canceled (if applicable).
    pub canceled_at: Option<i64>,

    /// First invoice, expanded on creation.
    pub latest_invoice: Option<Expandable<StripeInvoice>>,
}

impl StripeSubscription {
    /// Client secret of the expanded `latest_invoice.payment_intent`.
    pub fn client_secret(&self) -> Option<&str> {
        self.latest_invoice
            .as_ref()
            .and_then(Expandable::as_object)
            .and_then(|invoice| invoice.payment_intent.as_ref())
            .and_then(Expandable::as_object)
            .and_then(|intent| intent.client_secret.as_deref())
    }
}

impl From<StripeSubscription> for Subscription {
    fn from(subscription: StripeSubscription) -> Self {
        let client_secret = subscription.client_secret().map(str::to_owned);
        Subscription {
            id: subscription.id,
            customer_id: subscription.customer,
            status: subscription.status,
            client_secret,
            canceled_at: subscription.canceled_at,
        }
    }
}

/// Stripe error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiError,
}

/// Stripe error object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// `card_error`, `invalid_request_error`, `api_error`, ...
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    pub code: Option<String>,

    pub decline_code: Option<String>,

    pub message: Option<String>,
}
