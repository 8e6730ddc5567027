//! Invoice payment gateway service.
//!
//! A small HTTP service fronting third-party payment providers for the
//! invoice manager used by a chain of therapy centers.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser / internal tools
//!            │
//!            ▼
//!   ┌─────────────────────────────────────────────┐
//!   │               INVOICE GATEWAY               │
//!   │                                             │
//!   │  middleware: trace → request id → CORS      │
//!   │            → timeout                        │
//!   │                                             │
//!   │  /api/links, /api/checkout  ──► gateway     │──► provider REST APIs
//!   │  /api/orders, /api/callbacks     clients    │    (Razorpay, PhonePe)
//!   │                                             │
//!   │  /{*path} ──► routing ──► proxy adapter ────│──► provider REST APIs
//!   │                                             │
//!   │  config · settings store · metrics · logs   │
//!   └─────────────────────────────────────────────┘
//! ```
//!
//! Each request is handled independently: one inbound call, at most one
//! upstream round trip, one response.

use std::path::Path;
use tokio::net::TcpListener;

use invoice_gateway::config::{load_config, GatewayConfig};
use invoice_gateway::http::HttpServer;
use invoice_gateway::lifecycle::Shutdown;
use invoice_gateway::observability::{logging, metrics};
use invoice_gateway::settings::SettingsStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file path as the only argument; defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "invoice-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        providers = config.providers.len(),
        allowed_origin = %config.cors.allowed_origin,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let settings = match &config.settings.persistence_path {
        Some(path) => SettingsStore::load_from_file(path)?,
        None => SettingsStore::new(None),
    };
    if !settings.is_configured() {
        tracing::warn!("provider credentials incomplete; link and order routes will answer 503");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    shutdown.listen_for_ctrl_c();

    let server = HttpServer::new(config, settings)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
