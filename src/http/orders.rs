//! Order status and provider callback handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::gateway::PhonePeClient;
use crate::http::error::GatewayError;
use crate::http::server::AppState;

pub async fn order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Response {
    let Some((merchant_id, token)) = state.settings.phonepe_credentials() else {
        return GatewayError::NotConfigured("phonepe").into_response();
    };

    let client = PhonePeClient::new(
        state.client.clone(),
        state.config.payments.phonepe_base.clone(),
        merchant_id,
        token,
    );

    match client.get_order_status(&order_id).await {
        Ok(status) => Json(serde_json::json!({
            "orderId": order_id,
            "state": status.state,
            "detail": status.raw,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(order_id = %order_id, error = %e, "order status lookup failed");
            e.into_response()
        }
    }
}

pub async fn phonepe_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some((username, password)) = state.settings.phonepe_callback_credentials() else {
        return GatewayError::NotConfigured("phonepe").into_response();
    };

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match PhonePeClient::validate_callback(&username, &password, authorization, &body) {
        Ok(result) => {
            tracing::info!(
                merchant_order_id = %result.merchant_order_id,
                state = ?result.state,
                "provider callback validated"
            );
            Json(serde_json::json!({
                "success": true,
                "merchantOrderId": result.merchant_order_id,
                "state": result.state,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "provider callback rejected");
            e.into_response()
        }
    }
}
