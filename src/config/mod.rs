// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{RelayError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Load configuration from the default file location.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest, prefix `GEMRELAY_`, `__` between levels)
    /// 2. Config file (`path`, or `~/.gemrelay/config.toml`)
    /// 3. Defaults (lowest)
    ///
    /// An explicitly given file must exist; the default one is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(RelayError::Config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                File::from(p).required(true)
            }
            None => File::from(Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("GEMRELAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| RelayError::Config(e.to_string()))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RelayError::Config(e.to_string()))
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gemrelay")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_gemini_api() {
        let config = AppConfig::default();
        assert_eq!(
            config.gemini.api_base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.gemini.model, "gemini-2.5-flash-preview-09-2025");
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert!(config.logging.sanitize_credentials);
    }

    #[test]
    fn test_toml_render_has_sections() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("[gemini]"));
        assert!(rendered.contains("api_key_env = \"GEMINI_API_KEY\""));
    }
}
