//! Shared types for the provider clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order lifecycle states reported by providers, normalized across both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Pending,
    Completed,
    Failed,
}

impl OrderState {
    /// Map a provider's raw state string. Unknown values are treated as
    /// still pending rather than failed.
    pub fn from_provider(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "COMPLETED" | "PAID" | "SUCCESS" => OrderState::Completed,
            "FAILED" | "CANCELLED" | "EXPIRED" => OrderState::Failed,
            _ => OrderState::Pending,
        }
    }
}

/// A payment link created at the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Provider-side link id.
    pub link_id: String,
    /// Shareable payment URL.
    pub short_url: String,
}

/// A hosted-checkout session created at the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// URL the customer is redirected to for payment.
    pub redirect_url: String,
    /// Provider-side order id.
    pub order_id: String,
}

/// Current status of an order, with the provider's raw detail.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatus {
    pub state: OrderState,
    pub raw: Value,
}

/// Result of validating a provider callback.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackResult {
    pub merchant_order_id: String,
    pub state: OrderState,
}
