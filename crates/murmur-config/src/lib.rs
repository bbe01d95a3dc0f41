//! murmur server configuration.
//!
//! TOML-based configuration for the listening endpoint, the shared
//! password, broadcast tuning and name decoration. Every section uses
//! serde defaults so a partial file (or none at all) works.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AuthConfig, BroadcastConfig, FanOutMode, ListenConfig, PresentationConfig, ServerConfig,
};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use murmur_common::ConfigError;
use std::path::Path;

/// Load config from `path` if given, otherwise from the platform default
/// location (creating a documented default file on first run).
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    match path {
        Some(path) => load_from_path(path),
        None => load_default(),
    }
}
