//! HTTP DTOs (Data Transfer Objects) for checkout endpoints.
//!
//! Field names are camelCase to match the browser client.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{
    CancelSubscriptionCommand, CancelSubscriptionResult, CreatePaymentIntentCommand,
    CreatePaymentIntentResult, CreateSubscriptionCommand, CreateSubscriptionResult,
};
use crate::ports::{PaymentIntent, SubscriptionStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a one-off payment intent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor units (e.g. haléře for CZK).
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
}

impl From<CreatePaymentIntentRequest> for CreatePaymentIntentCommand {
    fn from(req: CreatePaymentIntentRequest) -> Self {
        Self {
            amount: req.amount,
            currency: req.currency,
            description: req.description,
            product_id: req.product_id,
        }
    }
}

/// Request to start a subscription.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub price_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<CreateSubscriptionRequest> for CreateSubscriptionCommand {
    fn from(req: CreateSubscriptionRequest) -> Self {
        Self {
            price_id: req.price_id,
            email: req.email,
        }
    }
}

/// Request to cancel a subscription.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSubscriptionRequest {
    #[serde(default)]
    pub subscription_id: Option<String>,
}

impl From<CancelSubscriptionRequest> for CancelSubscriptionCommand {
    fn from(req: CancelSubscriptionRequest) -> Self {
        Self {
            subscription_id: req.subscription_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
}

impl From<CreatePaymentIntentResult> for PaymentIntentResponse {
    fn from(result: CreatePaymentIntentResult) -> Self {
        Self {
            client_secret: result.client_secret,
            payment_intent_id: result.payment_intent_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

impl From<PaymentIntent> for PaymentStatusResponse {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            id: intent.id,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub subscription_id: String,
    pub customer_id: String,
    pub client_secret: String,
    pub status: SubscriptionStatus,
}

impl From<CreateSubscriptionResult> for SubscriptionResponse {
    fn from(result: CreateSubscriptionResult) -> Self {
        Self {
            subscription_id: result.subscription_id,
            customer_id: result.customer_id,
            client_secret: result.client_secret,
            status: result.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSubscriptionResponse {
    pub status: SubscriptionStatus,
    pub canceled_at: Option<i64>,
}

impl From<CancelSubscriptionResult> for CancelSubscriptionResponse {
    fn from(result: CancelSubscriptionResult) -> Self {
        Self {
            status: result.status,
            canceled_at: result.canceled_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_intent_request_accepts_camel_case_and_omitted_fields() {
        let req: CreatePaymentIntentRequest =
            serde_json::from_value(json!({"amount": 2500, "productId": "pro"})).unwrap();

        assert_eq!(req.amount, Some(2500));
        assert_eq!(req.product_id.as_deref(), Some("pro"));
        assert!(req.currency.is_none());
    }

    #[test]
    fn payment_intent_request_without_amount_still_deserializes() {
        let req: CreatePaymentIntentRequest =
            serde_json::from_value(json!({"currency": "czk"})).unwrap();

        assert!(req.amount.is_none());
    }

    #[test]
    fn subscription_response_uses_camel_case() {
        let json = serde_json::to_value(SubscriptionResponse {
            subscription_id: "sub_1".to_string(),
            customer_id: "cus_1".to_string(),
            client_secret: "pi_1_secret".to_string(),
            status: SubscriptionStatus::Incomplete,
        })
        .unwrap();

        assert_eq!(
            json,
            json!({
                "subscriptionId": "sub_1",
                "customerId": "cus_1",
                "clientSecret": "pi_1_secret",
                "status": "incomplete"
            })
        );
    }

    #[test]
    fn cancel_response_carries_canceled_at() {
        let json = serde_json::to_value(CancelSubscriptionResponse {
            status: SubscriptionStatus::Canceled,
            canceled_at: Some(1704067200),
        })
        .unwrap();

        assert_eq!(json, json!({"status": "canceled", "canceledAt": 1704067200}));
    }
}
