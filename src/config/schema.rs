//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the payment gateway service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Proxied provider routes.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// CORS policy applied to every response.
    pub cors: CorsConfig,

    /// Timeout configuration for upstream calls.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Payment provider API endpoints used by the link and order routes.
    pub payments: PaymentApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin endpoint settings.
    pub admin: AdminConfig,

    /// Credentials store settings.
    pub settings: SettingsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            providers: default_providers(),
            cors: CorsConfig::default(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            payments: PaymentApiConfig::default(),
            observability: ObservabilityConfig::default(),
            admin: AdminConfig::default(),
            settings: SettingsConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// One mounted provider route.
///
/// Every route shape the service exposes is an instance of this config: the
/// catch-all passthrough, the dedicated payment-links route with its method
/// allow-list, and any future provider mount.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Local path prefix the route is mounted under (must start with `/`).
    pub mount_prefix: String,

    /// Upstream URL the stripped suffix is appended to.
    pub upstream_base: String,

    /// Optional method allow-list. When set, verbs outside the list are
    /// rejected with 405 before any upstream call.
    #[serde(default)]
    pub allowed_methods: Option<Vec<String>>,

    /// Quote a snippet of the raw payload in the error envelope when the
    /// upstream answers with something that is not JSON.
    #[serde(default)]
    pub strict_upstream_errors: bool,
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "razorpay-payment-links".to_string(),
            mount_prefix: "/api/razorpay/payment_links".to_string(),
            upstream_base: "https://api.razorpay.com/v1/payment_links".to_string(),
            allowed_methods: Some(
                ["GET", "POST", "PUT", "PATCH", "DELETE"]
                    .iter()
                    .map(|m| m.to_string())
                    .collect(),
            ),
            strict_upstream_errors: true,
        },
        ProviderConfig {
            name: "razorpay".to_string(),
            mount_prefix: "/api/razorpay".to_string(),
            upstream_base: "https://api.razorpay.com/v1".to_string(),
            allowed_methods: None,
            strict_upstream_errors: false,
        },
        ProviderConfig {
            name: "phonepe".to_string(),
            mount_prefix: "/api/phonepe".to_string(),
            upstream_base: "https://api.phonepe.com/apis/pg".to_string(),
            allowed_methods: None,
            strict_upstream_errors: false,
        },
    ]
}

/// CORS policy.
///
/// The origin is a configuration choice: `*` for the permissive policy or a
/// single fixed origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value sent as `Access-Control-Allow-Origin`.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 30,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Provider API endpoints for the link, checkout and order routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentApiConfig {
    /// Razorpay REST API root.
    pub razorpay_base: String,

    /// PhonePe REST API root.
    pub phonepe_base: String,

    /// ISO currency code sent with every created link.
    pub currency: String,

    /// Optional callback URL attached to created links.
    pub callback_url: Option<String>,
}

impl Default for PaymentApiConfig {
    fn default() -> Self {
        Self {
            razorpay_base: "https://api.razorpay.com/v1".to_string(),
            phonepe_base: "https://api.phonepe.com/apis/pg".to_string(),
            currency: "INR".to_string(),
            callback_url: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin/settings endpoints.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

/// Credentials store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SettingsConfig {
    /// JSON file the secrets store persists to. In-memory only when unset.
    pub persistence_path: Option<String>,
}
