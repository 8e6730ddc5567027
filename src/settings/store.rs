//! Provider credentials store.
//!
//! An explicit, injected store (constructed in main and carried in the
//! application state) rather than a process-global singleton. Secrets are
//! named strings; the store can persist to a JSON file and reload at
//! startup.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

/// Settings keys the service reads.
pub mod keys {
    pub const RAZORPAY_KEY_ID: &str = "razorpay.key_id";
    pub const RAZORPAY_KEY_SECRET: &str = "razorpay.key_secret";
    pub const PHONEPE_MERCHANT_ID: &str = "phonepe.merchant_id";
    pub const PHONEPE_TOKEN: &str = "phonepe.token";
    pub const PHONEPE_CALLBACK_USERNAME: &str = "phonepe.callback_username";
    pub const PHONEPE_CALLBACK_PASSWORD: &str = "phonepe.callback_password";
}

/// Every key that must be present for the service to be fully configured.
pub const REQUIRED_KEYS: &[&str] = &[
    keys::RAZORPAY_KEY_ID,
    keys::RAZORPAY_KEY_SECRET,
    keys::PHONEPE_MERCHANT_ID,
    keys::PHONEPE_TOKEN,
    keys::PHONEPE_CALLBACK_USERNAME,
    keys::PHONEPE_CALLBACK_PASSWORD,
];

/// A thread-safe named-secrets store.
#[derive(Clone, Default)]
pub struct SettingsStore {
    inner: Arc<DashMap<String, String>>,
    persistence_path: Option<String>,
}

impl SettingsStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<String>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists.
    pub fn load_from_file(path: &str) -> std::io::Result<Self> {
        let store = Self::new(Some(path.to_string()));
        if Path::new(path).exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let map: BTreeMap<String, String> = serde_json::from_reader(reader)?;

            for (k, v) in map {
                store.inner.insert(k, v);
            }
            tracing::info!(entries = store.inner.len(), "loaded settings store");
        }
        Ok(store)
    }

    /// Save to file.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);

            let map: BTreeMap<_, _> = self
                .inner
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect();

            serde_json::to_writer(writer, &map)?;
            tracing::debug!(entries = map.len(), "saved settings store");
        }
        Ok(())
    }

    /// Get a secret by name. Empty values count as absent.
    pub fn get(&self, name: &str) -> Option<String> {
        self.inner
            .get(name)
            .map(|r| r.value().clone())
            .filter(|v| !v.is_empty())
    }

    /// Set a secret and persist the store.
    pub fn set(&self, name: &str, value: &str) -> std::io::Result<()> {
        self.inner.insert(name.to_string(), value.to_string());
        self.save_to_file()
    }

    /// Names of all configured secrets, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// True when every required provider key is present and nonempty.
    pub fn is_configured(&self) -> bool {
        REQUIRED_KEYS.iter().all(|k| self.get(k).is_some())
    }

    /// Razorpay API credentials, when both halves are present.
    pub fn razorpay_credentials(&self) -> Option<(String, String)> {
        Some((
            self.get(keys::RAZORPAY_KEY_ID)?,
            self.get(keys::RAZORPAY_KEY_SECRET)?,
        ))
    }

    /// PhonePe API credentials, when both halves are present.
    pub fn phonepe_credentials(&self) -> Option<(String, String)> {
        Some((
            self.get(keys::PHONEPE_MERCHANT_ID)?,
            self.get(keys::PHONEPE_TOKEN)?,
        ))
    }

    /// PhonePe callback validation credentials.
    pub fn phonepe_callback_credentials(&self) -> Option<(String, String)> {
        Some((
            self.get(keys::PHONEPE_CALLBACK_USERNAME)?,
            self.get(keys::PHONEPE_CALLBACK_PASSWORD)?,
        ))
    }
}
