//! Invoice payment gateway service library.

pub mod admin;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod links;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod settings;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
