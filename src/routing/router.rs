//! Provider route lookup.
//!
//! # Responsibilities
//! - Compile provider configs into proxy rules
//! - Look up the rule mounted at a request path
//! - Return matched rule plus stripped suffix, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan, longest prefix first (route counts are tiny)
//! - Prefixes match on segment boundaries only
//! - Explicit None rather than silent default

use axum::http::Method;

use crate::config::schema::ProviderConfig;

/// A compiled proxy rule for one mounted provider route.
#[derive(Debug, Clone)]
pub struct ProxyRule {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Normalized mount prefix (no trailing slash).
    pub mount_prefix: String,

    /// Normalized upstream base URL (no trailing slash).
    pub upstream_base: String,

    /// Verbs accepted on this route; unrestricted when None.
    pub allowed_methods: Option<Vec<Method>>,

    /// Quote the raw payload in bad-JSON error envelopes.
    pub strict_upstream_errors: bool,
}

/// Immutable lookup table from request path to proxy rule.
pub struct ProviderRouter {
    /// Rules sorted longest prefix first so the most specific mount wins.
    rules: Vec<ProxyRule>,
}

impl ProviderRouter {
    /// Compile the configured provider routes.
    ///
    /// Method names were validated at config load; anything unparseable here
    /// is skipped rather than panicking.
    pub fn from_config(providers: &[ProviderConfig]) -> Self {
        let mut rules: Vec<ProxyRule> = providers
            .iter()
            .map(|p| ProxyRule {
                name: p.name.clone(),
                mount_prefix: p.mount_prefix.trim_end_matches('/').to_string(),
                upstream_base: p.upstream_base.trim_end_matches('/').to_string(),
                allowed_methods: p.allowed_methods.as_ref().map(|methods| {
                    methods.iter().filter_map(|m| m.parse().ok()).collect()
                }),
                strict_upstream_errors: p.strict_upstream_errors,
            })
            .collect();

        rules.sort_by(|a, b| b.mount_prefix.len().cmp(&a.mount_prefix.len()));

        Self { rules }
    }

    /// Match a request path against the mounted prefixes.
    ///
    /// Returns the rule and the path suffix after the prefix, with the
    /// leading slash stripped. `/api/razorpayments` does not match a mount
    /// at `/api/razorpay`.
    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<(&'a ProxyRule, &'a str)> {
        for rule in &self.rules {
            if let Some(rest) = path.strip_prefix(rule.mount_prefix.as_str()) {
                if rest.is_empty() || rest.starts_with('/') {
                    return Some((rule, rest.trim_start_matches('/')));
                }
            }
        }
        None
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no provider routes are mounted.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, prefix: &str, base: &str) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            mount_prefix: prefix.to_string(),
            upstream_base: base.to_string(),
            allowed_methods: None,
            strict_upstream_errors: false,
        }
    }

    #[test]
    fn test_prefix_match_strips_suffix() {
        let router = ProviderRouter::from_config(&[provider(
            "razorpay",
            "/api/razorpay",
            "https://api.razorpay.com/v1",
        )]);

        let (rule, suffix) = router.match_path("/api/razorpay/orders/ord_1").unwrap();
        assert_eq!(rule.name, "razorpay");
        assert_eq!(suffix, "orders/ord_1");

        let (_, suffix) = router.match_path("/api/razorpay").unwrap();
        assert_eq!(suffix, "");
    }

    #[test]
    fn test_longest_prefix_wins() {
        let router = ProviderRouter::from_config(&[
            provider("razorpay", "/api/razorpay", "https://api.razorpay.com/v1"),
            provider(
                "links",
                "/api/razorpay/payment_links",
                "https://api.razorpay.com/v1/payment_links",
            ),
        ]);

        let (rule, suffix) = router.match_path("/api/razorpay/payment_links").unwrap();
        assert_eq!(rule.name, "links");
        assert_eq!(suffix, "");

        let (rule, _) = router.match_path("/api/razorpay/orders").unwrap();
        assert_eq!(rule.name, "razorpay");
    }

    #[test]
    fn test_no_match_is_explicit() {
        let router = ProviderRouter::from_config(&[provider(
            "razorpay",
            "/api/razorpay",
            "https://api.razorpay.com/v1",
        )]);

        assert!(router.match_path("/api/stripe/charges").is_none());
        // Prefix must end on a segment boundary.
        assert!(router.match_path("/api/razorpayments").is_none());
    }

    #[test]
    fn test_method_list_compiled() {
        let mut config = provider(
            "links",
            "/api/razorpay/payment_links",
            "https://api.razorpay.com/v1/payment_links",
        );
        config.allowed_methods = Some(vec!["GET".to_string(), "POST".to_string()]);

        let router = ProviderRouter::from_config(&[config]);
        let (rule, _) = router.match_path("/api/razorpay/payment_links").unwrap();
        let allowed = rule.allowed_methods.as_ref().unwrap();
        assert!(allowed.contains(&Method::GET));
        assert!(allowed.contains(&Method::POST));
        assert!(!allowed.contains(&Method::DELETE));
    }
}
