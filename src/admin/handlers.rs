use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub configured: bool,
    pub links_issued: usize,
    pub requests_served: usize,
}

#[derive(Serialize)]
pub struct SettingEntry {
    pub name: String,
    pub value: String,
}

#[derive(Deserialize)]
pub struct SetSetting {
    pub name: String,
    pub value: String,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        configured: state.settings.is_configured(),
        links_issued: state.links.count(),
        requests_served: state.request_count.load(Ordering::Relaxed),
    })
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Vec<SettingEntry>> {
    let entries = state
        .settings
        .names()
        .into_iter()
        .map(|name| {
            let value = state
                .settings
                .get(&name)
                .map(|v| mask(&v))
                .unwrap_or_default();
            SettingEntry { name, value }
        })
        .collect();
    Json(entries)
}

pub async fn put_setting(
    State(state): State<AppState>,
    Json(body): Json<SetSetting>,
) -> Response {
    if body.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "validation_error",
                "message": "name must not be empty",
            })),
        )
            .into_response();
    }

    match state.settings.set(&body.name, &body.value) {
        Ok(()) => Json(serde_json::json!({ "ok": true, "name": body.name })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to persist settings");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "persistence_error",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Mask a secret for display; only the edges stay visible.
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[chars.len() - 2..].iter().collect();
        format!("{head}****{tail}")
    }
}
