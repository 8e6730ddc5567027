//! Configuration subsystem.
//!
//! Config is loaded once at startup and immutable afterwards; applying a
//! changed file means restarting the process.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use validation::{validate_config, ValidationError};
