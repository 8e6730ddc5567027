//! Payment link HTTP handlers.
//!
//! Bodies are decoded explicitly so malformed JSON gets the same
//! `{success: false}` envelope as every other failure on these routes.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::gateway::{PhonePeClient, RazorpayClient};
use crate::http::error::GatewayError;
use crate::http::server::AppState;
use crate::links::{CheckoutRequest, PaymentLinkRequest};

pub async fn create_link(State(state): State<AppState>, body: Bytes) -> Response {
    let request: PaymentLinkRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return GatewayError::BadRequestBody(e.to_string()).into_link_response(),
    };

    match state.links.create_link(&request).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "success": true, "link": record })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(invoice_number = %request.invoice_number, error = %e, "payment link creation failed");
            e.into_link_response()
        }
    }
}

pub async fn get_link(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.links.get_link(id) {
        Some(record) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "link": record })),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": "not_found",
                "message": "no such payment link",
            })),
        )
            .into_response(),
    }
}

pub async fn create_checkout(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CheckoutRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return GatewayError::BadRequestBody(e.to_string()).into_link_response(),
    };

    match state.links.create_checkout(&request).await {
        Ok((record, session)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "orderId": session.order_id,
                "merchantOrderId": record.merchant_order_id,
                "redirectUrl": session.redirect_url,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "checkout creation failed");
            e.into_link_response()
        }
    }
}

/// Current payment state of an issued link, fetched from its provider.
pub async fn link_status(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let Some(record) = state.links.get_link(id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": "not_found",
                "message": "no such payment link",
            })),
        )
            .into_response();
    };

    let result = match record.provider {
        "phonepe" => {
            let Some((merchant_id, token)) = state.settings.phonepe_credentials() else {
                return GatewayError::NotConfigured("phonepe").into_response();
            };
            let client = PhonePeClient::new(
                state.client.clone(),
                state.config.payments.phonepe_base.clone(),
                merchant_id,
                token,
            );
            client.get_order_status(&record.merchant_order_id).await
        }
        _ => {
            let Some((key_id, key_secret)) = state.settings.razorpay_credentials() else {
                return GatewayError::NotConfigured("razorpay").into_response();
            };
            let client = RazorpayClient::new(
                state.client.clone(),
                state.config.payments.razorpay_base.clone(),
                key_id,
                key_secret,
            );
            client.fetch_payment_link(&record.provider_id).await
        }
    };

    match result {
        Ok(status) => Json(serde_json::json!({
            "success": true,
            "merchantOrderId": record.merchant_order_id,
            "state": status.state,
            "detail": status.raw,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(link_id = %id, error = %e, "link status lookup failed");
            e.into_link_response()
        }
    }
}
