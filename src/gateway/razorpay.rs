//! Razorpay REST client.
//!
//! Thin wrapper over the provider's payment-links API: builds the payload,
//! authenticates with the key pair, and shapes the response. No business
//! logic lives here.

use serde_json::{json, Value};

use crate::gateway::types::{OrderState, OrderStatus, PaymentLink};
use crate::http::error::GatewayError;

/// Parameters for creating a payment link.
#[derive(Debug, Clone)]
pub struct CreateLinkParams {
    /// Amount in the smallest currency unit (paise for INR).
    pub amount: i64,
    pub currency: String,
    pub description: String,
    /// Merchant-side reference correlating the link to an invoice.
    pub reference_id: String,
    pub customer_name: String,
    pub phone: String,
    pub callback_url: Option<String>,
}

pub struct RazorpayClient {
    http: reqwest::Client,
    base: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(
        http: reqwest::Client,
        base: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }

    /// Create a payment link.
    pub async fn create_payment_link(
        &self,
        params: &CreateLinkParams,
    ) -> Result<PaymentLink, GatewayError> {
        let mut payload = json!({
            "amount": params.amount,
            "currency": params.currency,
            "description": params.description,
            "reference_id": params.reference_id,
            "customer": {
                "name": params.customer_name,
                "contact": params.phone,
            },
            "notify": { "sms": true },
        });
        if let Some(callback_url) = &params.callback_url {
            payload["callback_url"] = json!(callback_url);
            payload["callback_method"] = json!("get");
        }

        let body = self
            .post_json(&format!("{}/payment_links", self.base), &payload)
            .await?;

        let link_id = body["id"].as_str();
        let short_url = body["short_url"].as_str();
        match (link_id, short_url) {
            (Some(link_id), Some(short_url)) => Ok(PaymentLink {
                link_id: link_id.to_string(),
                short_url: short_url.to_string(),
            }),
            _ => Err(GatewayError::UpstreamBadJson {
                raw: body.to_string(),
                strict: false,
            }),
        }
    }

    /// Fetch a payment link and normalize its status.
    pub async fn fetch_payment_link(&self, link_id: &str) -> Result<OrderStatus, GatewayError> {
        let response = self
            .http
            .get(format!("{}/payment_links/{}", self.base, link_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

        let body = Self::decode(response).await?;
        let state = body["status"]
            .as_str()
            .map(OrderState::from_provider)
            .unwrap_or(OrderState::Pending);

        Ok(OrderStatus { state, raw: body })
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value, GatewayError> {
        let response = self
            .http
            .post(url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(payload)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

        Self::decode(response).await
    }

    /// Decode a provider response, surfacing JSON error bodies as
    /// `UpstreamRejected`.
    async fn decode(response: reqwest::Response) -> Result<Value, GatewayError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

        let body: Value = serde_json::from_str(&text).map_err(|_| {
            tracing::error!(status = status.as_u16(), raw = %text, "provider returned a non-JSON payload");
            GatewayError::UpstreamBadJson {
                raw: text.clone(),
                strict: false,
            }
        })?;

        if !status.is_success() {
            let detail = body["error"]["description"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string());
            return Err(GatewayError::UpstreamRejected {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(body)
    }
}
