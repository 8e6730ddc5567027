//! Provider route lookup.

pub mod router;

pub use router::{ProviderRouter, ProxyRule};
