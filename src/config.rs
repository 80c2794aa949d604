//! Application configuration
//!
//! Loaded from a TOML file, by default `~/.config/oicp-emp/config.toml`.
//! Every section and key is optional; missing values fall back to defaults.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! request_timeout_secs = 60
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [api]
//! service_name = "OICP v2.3 EMP Server API"
//! expose_metrics = true
//! include_error_details = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::support::errors::ConfigError;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "OICP_EMP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Advisory timeout handed to business handlers
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 60,
            shutdown_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Banner returned by `GET /`
    pub service_name: String,
    pub expose_metrics: bool,
    /// Defaults to on in debug builds, off in release builds.
    pub include_error_details: Option<bool>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            service_name: "OICP v2.3 EMP Server API".to_string(),
            expose_metrics: true,
            include_error_details: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.server.max_body_bytes < 1024 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be at least 1024".into(),
            ));
        }
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `$OICP_EMP_CONFIG`, else `~/.config/oicp-emp/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("oicp-emp")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert!(config.api.expose_metrics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_file_and_tolerates_missing_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nservice_name = \"Test EMP\"\nexpose_metrics = false").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.api.service_name, "Test EMP");
        assert!(!config.api.expose_metrics);

        let dir = tempfile::tempdir().unwrap();
        let missing = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing, AppConfig::default());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = AppConfig::from_toml("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "yaml".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.max_body_bytes = 10;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_path_ends_in_config_toml() {
        assert!(default_config_path().ends_with("config.toml"));
    }
}
