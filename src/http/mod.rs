//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → middleware (trace, request ID, CORS, timeout)
//!     → fixed routes (links, checkout, orders, callbacks, admin, health)
//!     → or the catch-all proxy handler (routing + proxy adapter)
//! ```

pub mod error;
pub mod links;
pub mod middleware;
pub mod orders;
pub mod server;

pub use error::{ErrorEnvelope, GatewayError};
pub use server::HttpServer;
