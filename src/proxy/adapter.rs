//! The gateway proxy adapter.
//!
//! # Responsibilities
//! - Translate one inbound request into one upstream request
//! - Enforce the per-route method allow-list before any network call
//! - Apply the fixed header policy (Content-Type, User-Agent, verbatim
//!   Authorization passthrough, nothing else)
//! - Issue exactly one upstream round trip and relay the result
//!
//! # Design Decisions
//! - Request construction is a pure function, separately testable from the
//!   network call
//! - No retries, no caching, no shared state between requests
//! - A non-JSON upstream payload is never relayed as if it were valid

use axum::http::{header, HeaderMap, Method};
use serde_json::Value;

use crate::http::error::GatewayError;
use crate::proxy::types::{ForwardedRequest, UpstreamResult};
use crate::routing::ProxyRule;

/// Identifying User-Agent sent on every upstream call.
pub const USER_AGENT: &str = concat!("invoice-gateway/", env!("CARGO_PKG_VERSION"));

/// Build the upstream request for an inbound call.
///
/// `suffix` is the inbound path with the route's mount prefix stripped;
/// its segments are appended to the rule's upstream base unchanged.
pub fn build_forwarded_request(
    rule: &ProxyRule,
    method: &Method,
    suffix: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<ForwardedRequest, GatewayError> {
    if let Some(allowed) = &rule.allowed_methods {
        if !allowed.contains(method) {
            return Err(GatewayError::MethodNotSupported {
                allowed: allowed.iter().map(|m| m.to_string()).collect(),
            });
        }
    }

    let mut url = if suffix.is_empty() {
        rule.upstream_base.clone()
    } else {
        format!("{}/{}", rule.upstream_base, suffix)
    };
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    // Only mutating verbs carry a payload upstream; whatever a caller
    // attached to a GET or DELETE is dropped. The payload is decoded and
    // re-serialized without touching any field.
    let body = match *method {
        Method::POST | Method::PUT | Method::PATCH if !body.is_empty() => {
            let value: Value = serde_json::from_slice(body)
                .map_err(|e| GatewayError::BadRequestBody(e.to_string()))?;
            Some(value)
        }
        _ => None,
    };

    Ok(ForwardedRequest {
        method: method.clone(),
        url,
        authorization,
        body,
    })
}

/// Issue the upstream call and interpret the response.
///
/// `strict` controls whether a non-JSON upstream payload is quoted back in
/// the error envelope; the raw text is logged either way.
pub async fn forward(
    client: &reqwest::Client,
    fwd: &ForwardedRequest,
    strict: bool,
) -> Result<UpstreamResult, GatewayError> {
    let mut request = client
        .request(fwd.method.clone(), fwd.url.as_str())
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(authorization) = &fwd.authorization {
        request = request.header(header::AUTHORIZATION, authorization);
    }
    if let Some(body) = &fwd.body {
        request = request.body(body.to_string());
    }

    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => Ok(UpstreamResult { status, body }),
        Err(_) => {
            tracing::error!(status, raw = %text, "upstream returned a non-JSON payload");
            Err(GatewayError::UpstreamBadJson { raw: text, strict })
        }
    }
}
