//! Gateway error taxonomy and the uniform JSON envelope callers receive.
//!
//! Every caller-visible failure becomes `{error, message}` JSON with an
//! appropriate status; the method gate additionally reports the verbs the
//! route accepts. The link-generation route wraps the same information as
//! `{success: false, error, message}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// How much of a non-JSON upstream payload is quoted back in strict mode.
const RAW_SNIPPET_MAX: usize = 200;

/// Failure taxonomy for the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider could not be reached at the transport level.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The provider answered with a payload that is not valid JSON.
    #[error("upstream returned a non-JSON payload")]
    UpstreamBadJson { raw: String, strict: bool },

    /// The provider answered with a JSON error body.
    #[error("upstream rejected the request with status {status}: {detail}")]
    UpstreamRejected { status: u16, detail: String },

    /// The verb is outside the route's allow-list.
    #[error("method not allowed on this route")]
    MethodNotSupported { allowed: Vec<String> },

    /// Caller-supplied data failed validation.
    #[error("{0}")]
    Validation(String),

    /// The inbound body could not be decoded as JSON.
    #[error("malformed request body: {0}")]
    BadRequestBody(String),

    /// Required credentials are missing from the settings store.
    #[error("{0} credentials are not configured")]
    NotConfigured(&'static str),

    /// No provider route is mounted at the requested path.
    #[error("no provider route matches this path")]
    NoRoute,
}

impl GatewayError {
    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UpstreamUnreachable(_) | GatewayError::UpstreamBadJson { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::MethodNotSupported { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Validation(_) | GatewayError::BadRequestBody(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::NoRoute => StatusCode::NOT_FOUND,
        }
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::UpstreamUnreachable(_) => "upstream_unreachable",
            GatewayError::UpstreamBadJson { .. } => "upstream_bad_json",
            GatewayError::UpstreamRejected { .. } => "upstream_rejected",
            GatewayError::MethodNotSupported { .. } => "method_not_supported",
            GatewayError::Validation(_) => "validation_error",
            GatewayError::BadRequestBody(_) => "bad_request_body",
            GatewayError::NotConfigured(_) => "not_configured",
            GatewayError::NoRoute => "no_route",
        }
    }

    /// Human-readable message for the envelope.
    ///
    /// The raw upstream payload is quoted (truncated) only when the matched
    /// route asked for strict error reporting; it is always logged where the
    /// error is raised.
    fn message(&self) -> String {
        match self {
            GatewayError::UpstreamBadJson { raw, strict: true } => {
                format!("upstream returned invalid JSON: {}", snippet(raw))
            }
            other => other.to_string(),
        }
    }

    /// Response in the link-generation route's `{success: false}` shape.
    pub fn into_link_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "success": false,
            "error": self.kind(),
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}

/// The uniform JSON shape used to report failures to callers.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    #[serde(rename = "allowedMethods", skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let allowed_methods = match &self {
            GatewayError::MethodNotSupported { allowed } => Some(allowed.clone()),
            _ => None,
        };
        let envelope = ErrorEnvelope {
            error: self.kind().to_string(),
            message: self.message(),
            allowed_methods,
        };
        (self.status(), Json(envelope)).into_response()
    }
}

fn snippet(raw: &str) -> &str {
    let mut end = RAW_SNIPPET_MAX.min(raw.len());
    while end < raw.len() && !raw.is_char_boundary(end) {
        end += 1;
    }
    &raw[..end]
}
