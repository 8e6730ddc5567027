//! End-to-end tests for the provider proxy routes.

use reqwest::{Method, StatusCode};
use serde_json::Value;

use invoice_gateway::config::schema::ProviderConfig;
use invoice_gateway::config::GatewayConfig;
use invoice_gateway::settings::SettingsStore;

mod common;
use common::{spawn_gateway, start_mock_upstream, MockUpstream};

fn proxy_config(upstream: &MockUpstream) -> GatewayConfig {
    let base = format!("http://{}/v1", upstream.addr);
    let mut config = GatewayConfig::default();
    config.providers = vec![
        ProviderConfig {
            name: "razorpay-payment-links".to_string(),
            mount_prefix: "/api/razorpay/payment_links".to_string(),
            upstream_base: format!("{base}/payment_links"),
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
            upstream_base: base,
            allowed_methods: None,
            strict_upstream_errors: false,
        },
    ];
    config
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn assert_cors_headers(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, PUT, PATCH, DELETE, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn test_forwards_path_query_and_relays_response() {
    let upstream = start_mock_upstream(200, r#"{"id":"ord_1","status":"created"}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .get(format!("{base}/api/razorpay/orders/ord_1?count=5"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "ord_1");

    let recorded = upstream.last_request().await.unwrap();
    assert_eq!(recorded.method, "GET");
    assert_eq!(recorded.path, "/v1/orders/ord_1?count=5");

    shutdown.trigger();
}

#[tokio::test]
async fn test_authorization_forwarded_verbatim() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    client()
        .get(format!("{base}/api/razorpay/orders"))
        .header("Authorization", "Bearer xyz")
        .send()
        .await
        .unwrap();
    let recorded = upstream.last_request().await.unwrap();
    assert_eq!(recorded.header("authorization"), Some("Bearer xyz"));

    client()
        .get(format!("{base}/api/razorpay/orders"))
        .send()
        .await
        .unwrap();
    let recorded = upstream.last_request().await.unwrap();
    assert_eq!(recorded.header("authorization"), None);

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_body_forwarded_verbatim() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .post(format!("{base}/api/razorpay/orders"))
        .header("Content-Type", "application/json")
        .body(r#"{"foo":"bar"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let recorded = upstream.last_request().await.unwrap();
    let sent: Value = serde_json::from_str(&recorded.body).unwrap();
    assert_eq!(sent, serde_json::json!({"foo": "bar"}));
    assert_eq!(recorded.header("content-type"), Some("application/json"));
    assert!(recorded
        .header("user-agent")
        .unwrap()
        .starts_with("invoice-gateway/"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_get_sends_no_body_upstream() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    client()
        .get(format!("{base}/api/razorpay/orders"))
        .body(r#"{"ignored":true}"#)
        .send()
        .await
        .unwrap();

    let recorded = upstream.last_request().await.unwrap();
    assert_eq!(recorded.body, "");

    shutdown.trigger();
}

#[tokio::test]
async fn test_preflight_never_calls_upstream() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .request(Method::OPTIONS, format!("{base}/api/razorpay/orders"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert_eq!(response.text().await.unwrap(), "");
    assert_eq!(upstream.call_count(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_method_gate_on_payment_links_route() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;
    let url = format!("{base}/api/razorpay/payment_links");

    let response = client()
        .request(Method::HEAD, &url)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors_headers(&response);
    assert_eq!(upstream.call_count(), 0);

    // A verb with a readable response body carries the allow-list.
    let response = client()
        .request(Method::TRACE, &url)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "method_not_supported");
    assert_eq!(
        body["allowedMethods"],
        serde_json::json!(["GET", "POST", "PUT", "PATCH", "DELETE"])
    );
    assert_eq!(upstream.call_count(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_unreachable_returns_envelope() {
    let mut config = GatewayConfig::default();
    config.providers = vec![ProviderConfig {
        name: "razorpay".to_string(),
        mount_prefix: "/api/razorpay".to_string(),
        // The discard port refuses connections immediately.
        upstream_base: "http://127.0.0.1:9/v1".to_string(),
        allowed_methods: None,
        strict_upstream_errors: false,
    }];
    let (base, shutdown) = spawn_gateway(config, SettingsStore::new(None)).await;

    let response = client()
        .get(format!("{base}/api/razorpay/orders"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "upstream_unreachable");
    assert!(!body["message"].as_str().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_upstream_strict_route_quotes_payload() {
    let upstream = start_mock_upstream(200, "<html>Error</html>").await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .post(format!("{base}/api/razorpay/payment_links"))
        .body(r#"{"amount":50000}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "upstream_bad_json");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("<html>Error</html>"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_upstream_generic_route_omits_payload() {
    let upstream = start_mock_upstream(200, "<html>Error</html>").await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .get(format!("{base}/api/razorpay/orders"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "upstream_bad_json");
    assert!(!body["message"].as_str().unwrap().contains("<html>"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_status_relayed_unchanged() {
    let upstream =
        start_mock_upstream(404, r#"{"error":{"code":"BAD_REQUEST_ERROR"}}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .get(format!("{base}/api/razorpay/orders/nope"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST_ERROR");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_route_is_404_envelope() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .get(format!("{base}/api/stripe/charges"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_cors_headers(&response);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "no_route");
    assert_eq!(upstream.call_count(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_inbound_body_rejected_before_upstream() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .post(format!("{base}/api/razorpay/orders"))
        .body("not json at all")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_request_body");
    assert_eq!(upstream.call_count(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_assigned_and_echoed() {
    let upstream = start_mock_upstream(200, r#"{"ok":true}"#).await;
    let (base, shutdown) = spawn_gateway(proxy_config(&upstream), SettingsStore::new(None)).await;

    let response = client()
        .get(format!("{base}/api/razorpay/orders"))
        .send()
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let response = client()
        .get(format!("{base}/api/razorpay/orders"))
        .header("x-request-id", "test-correlation-id")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-correlation-id"
    );

    shutdown.trigger();
}
