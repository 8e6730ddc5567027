//! PhonePe REST client.
//!
//! Hosted-checkout creation, order status lookup, and callback validation.
//! Callback authenticity is a SHA-256 digest of the configured
//! `username:password` pair, compared in constant time against the value
//! the provider sends in the callback's authorization header.

use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::gateway::types::{CallbackResult, CheckoutSession, OrderState, OrderStatus};
use crate::http::error::GatewayError;

pub struct PhonePeClient {
    http: reqwest::Client,
    base: String,
    merchant_id: String,
    token: String,
}

impl PhonePeClient {
    pub fn new(
        http: reqwest::Client,
        base: impl Into<String>,
        merchant_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            merchant_id: merchant_id.into(),
            token: token.into(),
        }
    }

    /// Create a hosted-checkout session for an order.
    pub async fn create_checkout(
        &self,
        amount: i64,
        redirect_url: &str,
        merchant_order_id: &str,
    ) -> Result<CheckoutSession, GatewayError> {
        let payload = json!({
            "merchantOrderId": merchant_order_id,
            "amount": amount,
            "paymentFlow": {
                "type": "PG_CHECKOUT",
                "merchantUrls": { "redirectUrl": redirect_url },
            },
        });

        let response = self
            .http
            .post(format!("{}/checkout/v2/pay", self.base))
            .header("Authorization", format!("O-Bearer {}", self.token))
            .header("X-MERCHANT-ID", &self.merchant_id)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

        let body = Self::decode(response).await?;

        let order_id = body["orderId"].as_str();
        let redirect = body["redirectUrl"].as_str();
        match (order_id, redirect) {
            (Some(order_id), Some(redirect)) => Ok(CheckoutSession {
                order_id: order_id.to_string(),
                redirect_url: redirect.to_string(),
            }),
            _ => Err(GatewayError::UpstreamBadJson {
                raw: body.to_string(),
                strict: false,
            }),
        }
    }

    /// Look up the current state of an order.
    pub async fn get_order_status(
        &self,
        merchant_order_id: &str,
    ) -> Result<OrderStatus, GatewayError> {
        let response = self
            .http
            .get(format!(
                "{}/checkout/v2/order/{}/status",
                self.base, merchant_order_id
            ))
            .header("Authorization", format!("O-Bearer {}", self.token))
            .header("X-MERCHANT-ID", &self.merchant_id)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

        let body = Self::decode(response).await?;
        let state = body["state"]
            .as_str()
            .map(OrderState::from_provider)
            .unwrap_or(OrderState::Pending);

        Ok(OrderStatus { state, raw: body })
    }

    /// Validate an inbound provider callback.
    ///
    /// The provider authenticates callbacks by sending
    /// `SHA256(username:password)` as the authorization header value; the
    /// expected digest is computed from the configured pair and compared in
    /// constant time.
    pub fn validate_callback(
        username: &str,
        password: &str,
        authorization: &str,
        raw_body: &[u8],
    ) -> Result<CallbackResult, GatewayError> {
        let expected = callback_digest(username, password);
        let authorization = authorization.trim().to_ascii_lowercase();

        let matches: bool = expected
            .as_bytes()
            .ct_eq(authorization.as_bytes())
            .into();
        if !matches {
            return Err(GatewayError::Validation(
                "callback authorization mismatch".to_string(),
            ));
        }

        let body: Value = serde_json::from_slice(raw_body)
            .map_err(|e| GatewayError::BadRequestBody(e.to_string()))?;

        let payload = &body["payload"];
        let merchant_order_id = payload["merchantOrderId"]
            .as_str()
            .or_else(|| payload["orderId"].as_str())
            .ok_or_else(|| {
                GatewayError::BadRequestBody("callback payload has no order id".to_string())
            })?;
        let state = payload["state"]
            .as_str()
            .map(OrderState::from_provider)
            .unwrap_or(OrderState::Pending);

        Ok(CallbackResult {
            merchant_order_id: merchant_order_id.to_string(),
            state,
        })
    }

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
            let detail = body["message"]
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

/// Hex-encoded SHA-256 of `username:password`.
fn callback_digest(username: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{username}:{password}").as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        use std::fmt::Write;
        let _ = write!(out, "{b:02x}");
        out
    })
}
