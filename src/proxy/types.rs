//! Transient request/response shapes for the proxy adapter.
//!
//! Both types live for a single inbound call and are discarded once the
//! response is written; nothing here is persisted or shared.

use axum::http::Method;
use serde_json::Value;

/// One outbound request, constructed per inbound call.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    /// Verb forwarded unchanged from the caller.
    pub method: Method,

    /// Fully constructed upstream URL, query string included.
    pub url: String,

    /// Caller's `Authorization` value, passed through verbatim when present.
    pub authorization: Option<String>,

    /// Re-serialized JSON payload; only mutating verbs carry one.
    pub body: Option<Value>,
}

/// What the upstream answered, before relay to the caller.
#[derive(Debug, Clone)]
pub struct UpstreamResult {
    /// Upstream status code, relayed unchanged.
    pub status: u16,

    /// Parsed JSON body.
    pub body: Value,
}
