//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic parsing. Validation is a pure
//! function over the config and returns every error found, not just the
//! first, so an operator can fix a bad file in one pass.

use axum::http::Method;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BadBindAddress(String),

    #[error("provider `{0}`: mount_prefix `{1}` must start with '/'")]
    BadMountPrefix(String, String),

    #[error("provider `{0}`: upstream_base `{1}` is not a valid http(s) URL")]
    BadUpstreamBase(String, String),

    #[error("mount_prefix `{0}` is configured more than once")]
    DuplicateMountPrefix(String),

    #[error("provider `{0}`: `{1}` is not a valid HTTP method")]
    BadAllowedMethod(String, String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("cors.allowed_origin must not be empty")]
    EmptyOrigin,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut seen_prefixes = std::collections::HashSet::new();
    for provider in &config.providers {
        if !provider.mount_prefix.starts_with('/') {
            errors.push(ValidationError::BadMountPrefix(
                provider.name.clone(),
                provider.mount_prefix.clone(),
            ));
        }

        if !seen_prefixes.insert(provider.mount_prefix.as_str()) {
            errors.push(ValidationError::DuplicateMountPrefix(
                provider.mount_prefix.clone(),
            ));
        }

        match Url::parse(&provider.upstream_base) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => errors.push(ValidationError::BadUpstreamBase(
                provider.name.clone(),
                provider.upstream_base.clone(),
            )),
        }

        if let Some(methods) = &provider.allowed_methods {
            for method in methods {
                if method.parse::<Method>().is_err() {
                    errors.push(ValidationError::BadAllowedMethod(
                        provider.name.clone(),
                        method.clone(),
                    ));
                }
            }
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.cors.allowed_origin.trim().is_empty() {
        errors.push(ValidationError::EmptyOrigin);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
