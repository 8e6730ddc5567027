//! Provider credentials storage.

pub mod store;

pub use store::{keys, SettingsStore, REQUIRED_KEYS};
