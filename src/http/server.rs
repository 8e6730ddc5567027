//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, timeout)
//! - Dispatch proxied requests through the provider router and adapter
//! - Serve plain or TLS listeners with graceful shutdown

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{middleware, Json, Router};
use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::config::GatewayConfig;
use crate::http::error::GatewayError;
use crate::http::middleware::{cors, request_id};
use crate::http::{links, orders};
use crate::links::LinkEngine;
use crate::net;
use crate::observability::metrics;
use crate::proxy::{build_forwarded_request, forward, USER_AGENT};
use crate::routing::ProviderRouter;
use crate::settings::SettingsStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub router: Arc<ProviderRouter>,
    pub client: reqwest::Client,
    pub links: LinkEngine,
    pub settings: SettingsStore,
    pub request_count: Arc<AtomicUsize>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig, settings: SettingsStore) -> Result<Self, reqwest::Error> {
        let provider_router = Arc::new(ProviderRouter::from_config(&config.providers));

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let links = LinkEngine::new(client.clone(), settings.clone(), config.payments.clone());

        let state = AppState {
            config: Arc::new(config.clone()),
            router: provider_router,
            client,
            links,
            settings,
            request_count: Arc::new(AtomicUsize::new(0)),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(health))
            .route("/api/links", post(links::create_link))
            .route("/api/links/{id}", get(links::get_link))
            .route("/api/links/{id}/status", get(links::link_status))
            .route("/api/checkout", post(links::create_checkout))
            .route("/api/orders/{order_id}/status", get(orders::order_status))
            .route("/api/callbacks/phonepe", post(orders::phonepe_callback));

        if config.admin.enabled {
            router = router.merge(admin::admin_router(state.clone()));
        }

        router
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn_with_state(
                        state.clone(),
                        request_id::request_id_middleware,
                    ))
                    .layer(middleware::from_fn_with_state(state, cors::cors_middleware))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let HttpServer { router, config } = self;

        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if let Some(tls) = &config.listener.tls {
            let rustls = net::tls::load_tls_config(
                Path::new(&tls.cert_path),
                Path::new(&tls.key_path),
            )
            .await?;

            let handle = axum_server::Handle::new();
            let watcher = handle.clone();
            tokio::spawn(async move {
                let _ = shutdown.recv().await;
                watcher.graceful_shutdown(Some(Duration::from_secs(10)));
            });

            axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                .handle(handle)
                .serve(router.into_make_service())
                .await?;
        } else {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown.recv().await;
                })
                .await?;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Liveness endpoint.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "invoice-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "configured": state.settings.is_configured(),
    }))
}

/// Main proxy handler.
///
/// Looks up the provider rule for the path, builds the upstream request,
/// issues the single round trip and relays the result. Preflight OPTIONS
/// requests never reach this handler; the CORS middleware answers them.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let request_id = request
        .headers()
        .get(request_id::X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let matched = state
        .router
        .match_path(&path)
        .map(|(rule, suffix)| (rule.clone(), suffix.to_string()));
    let Some((rule, suffix)) = matched else {
        tracing::warn!(request_id = %request_id, path = %path, "no provider route matched");
        metrics::record_request(method.as_str(), 404, "none", start);
        return GatewayError::NoRoute.into_response();
    };

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, state.config.limits.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            metrics::record_request(method.as_str(), 400, &rule.name, start);
            return GatewayError::BadRequestBody(format!("failed to buffer request body: {e}"))
                .into_response();
        }
    };

    let forwarded = match build_forwarded_request(
        &rule,
        &method,
        &suffix,
        query.as_deref(),
        &parts.headers,
        &body_bytes,
    ) {
        Ok(forwarded) => forwarded,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %e,
                "request rejected before upstream call"
            );
            metrics::record_request(method.as_str(), e.status().as_u16(), &rule.name, start);
            return e.into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %forwarded.url,
        provider = %rule.name,
        "forwarding request"
    );

    match forward(&state.client, &forwarded, rule.strict_upstream_errors).await {
        Ok(upstream) => {
            metrics::record_request(method.as_str(), upstream.status, &rule.name, start);
            tracing::debug!(
                request_id = %request_id,
                status = upstream.status,
                provider = %rule.name,
                "relayed upstream response"
            );
            let status =
                StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(upstream.body)).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                provider = %rule.name,
                error = %e,
                "upstream call failed"
            );
            metrics::record_upstream_error(e.kind());
            metrics::record_request(method.as_str(), e.status().as_u16(), &rule.name, start);
            e.into_response()
        }
    }
}
