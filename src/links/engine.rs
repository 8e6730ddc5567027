//! Payment link and checkout orchestration.
//!
//! Validates caller input, generates the merchant order id, makes the
//! single provider call, and remembers what was issued for later status
//! lookups. Credentials are read from the injected settings store at call
//! time so keys set through the admin endpoints take effect immediately.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::config::schema::PaymentApiConfig;
use crate::gateway::{CheckoutSession, CreateLinkParams, PhonePeClient, RazorpayClient};
use crate::http::error::GatewayError;
use crate::observability::metrics;
use crate::settings::SettingsStore;

/// A caller's request to issue a payment link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkRequest {
    /// Amount in the smallest currency unit (paise for INR).
    pub amount: i64,
    pub customer_name: String,
    /// 10-digit customer phone number.
    pub phone: String,
    pub invoice_number: String,
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// A caller's request to start a hosted checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub redirect_url: String,
    #[serde(default)]
    pub invoice_number: Option<String>,
}

/// One issued payment link or checkout session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkRecord {
    pub id: Uuid,
    pub provider: &'static str,
    /// Provider-side id of the link or order.
    pub provider_id: String,
    /// Merchant-side id correlating initiation, status checks and callbacks.
    pub merchant_order_id: String,
    pub invoice_number: String,
    pub amount: i64,
    pub short_url: String,
    /// Seconds since epoch.
    pub created_at: u64,
}

/// Engine for issuing and tracking payment links.
#[derive(Clone)]
pub struct LinkEngine {
    http: reqwest::Client,
    settings: SettingsStore,
    payments: PaymentApiConfig,
    links: Arc<DashMap<Uuid, PaymentLinkRecord>>,
}

impl LinkEngine {
    pub fn new(
        http: reqwest::Client,
        settings: SettingsStore,
        payments: PaymentApiConfig,
    ) -> Self {
        Self {
            http,
            settings,
            payments,
            links: Arc::new(DashMap::new()),
        }
    }

    /// Issue a payment link for an invoice.
    pub async fn create_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLinkRecord, GatewayError> {
        validate_link_request(request)?;

        let (key_id, key_secret) = self
            .settings
            .razorpay_credentials()
            .ok_or(GatewayError::NotConfigured("razorpay"))?;

        let merchant_order_id = merchant_order_id(&request.invoice_number);
        let params = CreateLinkParams {
            amount: request.amount,
            currency: self.payments.currency.clone(),
            description: format!("Invoice {}", request.invoice_number),
            reference_id: merchant_order_id.clone(),
            customer_name: request.customer_name.trim().to_string(),
            phone: request.phone.clone(),
            callback_url: request
                .callback_url
                .clone()
                .or_else(|| self.payments.callback_url.clone()),
        };

        tracing::info!(
            merchant_order_id = %merchant_order_id,
            invoice_number = %request.invoice_number,
            amount = request.amount,
            "creating payment link"
        );

        let client = RazorpayClient::new(
            self.http.clone(),
            self.payments.razorpay_base.clone(),
            key_id,
            key_secret,
        );
        let link = client.create_payment_link(&params).await?;

        let record = PaymentLinkRecord {
            id: Uuid::new_v4(),
            provider: "razorpay",
            provider_id: link.link_id,
            merchant_order_id,
            invoice_number: request.invoice_number.clone(),
            amount: request.amount,
            short_url: link.short_url,
            created_at: unix_now(),
        };

        self.links.insert(record.id, record.clone());
        metrics::record_link_created("razorpay");

        Ok(record)
    }

    /// Start a hosted checkout session.
    pub async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<(PaymentLinkRecord, CheckoutSession), GatewayError> {
        if request.amount <= 0 {
            return Err(GatewayError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        if request.redirect_url.trim().is_empty() {
            return Err(GatewayError::Validation(
                "redirectUrl must not be empty".to_string(),
            ));
        }

        let (merchant_id, token) = self
            .settings
            .phonepe_credentials()
            .ok_or(GatewayError::NotConfigured("phonepe"))?;

        let invoice_number = request.invoice_number.clone().unwrap_or_default();
        let merchant_order_id = merchant_order_id(&invoice_number);

        let client = PhonePeClient::new(
            self.http.clone(),
            self.payments.phonepe_base.clone(),
            merchant_id,
            token,
        );
        let session = client
            .create_checkout(request.amount, &request.redirect_url, &merchant_order_id)
            .await?;

        let record = PaymentLinkRecord {
            id: Uuid::new_v4(),
            provider: "phonepe",
            provider_id: session.order_id.clone(),
            merchant_order_id,
            invoice_number,
            amount: request.amount,
            short_url: session.redirect_url.clone(),
            created_at: unix_now(),
        };

        self.links.insert(record.id, record.clone());
        metrics::record_link_created("phonepe");

        Ok((record, session))
    }

    /// Look up an issued link by id.
    pub fn get_link(&self, id: Uuid) -> Option<PaymentLinkRecord> {
        self.links.get(&id).map(|r| r.value().clone())
    }

    /// Number of links issued since startup.
    pub fn count(&self) -> usize {
        self.links.len()
    }
}

/// Validate a payment link request. Each rule is checked independently and
/// rejects the request before any upstream call.
pub fn validate_link_request(request: &PaymentLinkRequest) -> Result<(), GatewayError> {
    if request.amount <= 0 {
        return Err(GatewayError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }
    if request.phone.len() != 10 || !request.phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(GatewayError::Validation(
            "phone must be a 10-digit number".to_string(),
        ));
    }
    if request.customer_name.trim().is_empty() {
        return Err(GatewayError::Validation(
            "customerName must not be blank".to_string(),
        ));
    }
    if request.invoice_number.trim().is_empty() {
        return Err(GatewayError::Validation(
            "invoiceNumber is required".to_string(),
        ));
    }
    Ok(())
}

/// Generate a merchant order id tied to the invoice number.
fn merchant_order_id(invoice_number: &str) -> String {
    let slug: String = invoice_number
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if slug.is_empty() {
        format!("ord-{}", Uuid::new_v4().simple())
    } else {
        format!("inv-{}-{:08x}", slug, fastrand::u32(..))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
