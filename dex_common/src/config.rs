//! Configuration loading traits and types.
//!
//! Standardized TOML loading for DEX applications. The register descriptor
//! and any binary-side configuration go through [`ConfigLoader`]; loading
//! failures map onto [`ConfigError`] and are fatal at construction.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dex_common::config::{ConfigError, ConfigLoader};
//! use dex_common::registers::RegisterMap;
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let map = RegisterMap::load(Path::new("config/gripper.toml"))?;
//!     map.validate()?;
//!     println!("supervising {}", map.mechanism.name);
//!     Ok(())
//! }
//! ```

use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed or a required key is missing.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid or a
///   required key is missing
/// - Semantic validation is the caller's step (`validate()` on the loaded
///   type), surfaced as `ConfigError::ValidationError`
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any serde-deserializable struct can use
// ConfigLoader.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize)]
    struct DemoConfig {
        name: String,
        ticks: u32,
    }

    #[test]
    fn load_parses_valid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"name = \"grip\"\nticks = 50\n").unwrap();
        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.name, "grip");
        assert_eq!(config.ticks, 50);
    }

    #[test]
    fn load_maps_missing_file() {
        let err = DemoConfig::load(Path::new("/nonexistent/demo.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound));
    }

    #[test]
    fn load_maps_syntax_errors() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"name = \n").unwrap();
        let err = DemoConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn errors_render_for_operators() {
        let err = ConfigError::ValidationError("time_limit must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: time_limit must be positive"
        );
    }
}
