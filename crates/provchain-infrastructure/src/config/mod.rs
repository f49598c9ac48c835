//! Configuration
//!
//! Figment-backed loading of [`ProvchainConfig`] from defaults, TOML and
//! environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{LoggingConfig, ProvchainConfig};
