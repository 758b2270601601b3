//! CancelSubscriptionHandler - Command handler for cancelling subscriptions.

use std::sync::Arc;

use tracing::info;

use crate::domain::payment::PaymentRequestError;
use crate::ports::{PaymentProvider, SubscriptionStatus};

use super::CheckoutError;

/// Command to cancel a subscription immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelSubscriptionCommand {
    pub subscription_id: Option<String>,
}

/// Result of successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelSubscriptionResult {
    pub status: SubscriptionStatus,
    /// Unix timestamp of the cancellation, as reported by the provider.
    pub canceled_at: Option<i64>,
}

/// Handler for cancelling subscriptions.
pub struct CancelSubscriptionHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CancelSubscriptionHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, CheckoutError> {
        let subscription_id = cmd
            .subscription_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(PaymentRequestError::MissingSubscriptionId)?;

        let subscription = self.provider.cancel_subscription(subscription_id).await?;

        info!(
            subscription_id = %subscription.id,
            status = %subscription.status,
            "Subscription cancelled"
        );

        Ok(CancelSubscriptionResult {
            status: subscription.status,
            canceled_at: subscription.canceled_at,
        })
    }
}
