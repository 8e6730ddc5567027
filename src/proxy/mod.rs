//! Gateway proxy adapter.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → routing (match mount prefix, strip suffix)
//!     → adapter::build_forwarded_request (method gate, URL, headers, body)
//!     → adapter::forward (one upstream round trip)
//!     → relay upstream status + JSON, or an error envelope
//! ```

pub mod adapter;
pub mod types;

pub use adapter::{build_forwarded_request, forward, USER_AGENT};
pub use types::{ForwardedRequest, UpstreamResult};
