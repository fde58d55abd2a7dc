//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Resolve the raw key set into an immutable `EngineConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let engine = ConfigLoader::load_engine_config(Path::new("config.toml")).unwrap();
//! println!("Channels: {}", engine.channels);
//! ```

mod parser;
mod resolve;
mod validator;

pub use contracts::{AcquisitionConfig, EngineConfig};
pub use parser::ConfigFormat;
pub use resolve::resolve;

use contracts::AcquisitionError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load raw configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<AcquisitionConfig, AcquisitionError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load raw configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<AcquisitionConfig, AcquisitionError> {
        Self::parse_and_validate(content, format)
    }

    /// Load and resolve straight to the immutable engine form
    pub fn load_engine_config(path: &Path) -> Result<EngineConfig, AcquisitionError> {
        let raw = Self::load_from_path(path)?;
        resolve::resolve(raw)
    }

    /// Serialize AcquisitionConfig to TOML string
    pub fn to_toml(config: &AcquisitionConfig) -> Result<String, AcquisitionError> {
        toml::to_string_pretty(config)
            .map_err(|e| AcquisitionError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize AcquisitionConfig to JSON string
    pub fn to_json(config: &AcquisitionConfig) -> Result<String, AcquisitionError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| AcquisitionError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, AcquisitionError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            AcquisitionError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            AcquisitionError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, AcquisitionError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<AcquisitionConfig, AcquisitionError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
capacity = 16
ports = ["/dev/ttyACM0"]
baud = 1000000
timeout = 50
channels = 4
ts_key = "millis"

[[map]]
port = 0
path = "acceleration.x_g"
to = 0

[[map]]
port = 0
path = "sound_level"
to = 3
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.capacity, 16);
        assert_eq!(config.channels, 4);
        assert_eq!(config.ts_key, "millis");
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config.capacity, config2.capacity);
        assert_eq!(config.ports, config2.ports);
        assert_eq!(config.channels, config2.channels);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config.capacity, config2.capacity);
        assert_eq!(config.ts_key, config2.ts_key);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        // Zero capacity should fail validation
        let content = r#"
capacity = 0
ports = ["/dev/ttyACM0"]
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("capacity"));
    }
}
