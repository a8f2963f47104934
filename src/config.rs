//! Configuration for the InfluxDB exporter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Zenoh connection settings.
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// InfluxDB write endpoint settings.
    #[serde(default)]
    pub influxdb: InfluxConfig,

    /// Device label table settings.
    #[serde(default)]
    pub devices: DeviceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Common Zenoh connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZenohConfig {
    /// Zenoh mode: "client", "peer", or "router".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Endpoints to connect to (for client mode).
    #[serde(default)]
    pub connect: Vec<String>,

    /// Endpoints to listen on (for peer/router mode).
    #[serde(default)]
    pub listen: Vec<String>,
}

fn default_mode() -> String {
    "peer".to_string()
}

impl Default for ZenohConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            connect: Vec::new(),
            listen: Vec::new(),
        }
    }
}

/// InfluxDB write endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluxConfig {
    /// Full write URL, including the database query parameter
    /// (default: "http://localhost:8086/write?db=telemetry").
    #[serde(default = "default_write_url")]
    pub write_url: String,

    /// Username for HTTP basic auth (optional).
    #[serde(default)]
    pub username: Option<String>,

    /// Password for HTTP basic auth (optional).
    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_write_url() -> String {
    "http://localhost:8086/write?db=telemetry".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            write_url: default_write_url(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Device label table configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Extra device-id-suffix to label entries. These extend and override
    /// the built-in table.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = json5::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.influxdb.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        let url = &self.influxdb.write_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "Invalid write URL (must be http or https): {}",
                url
            )));
        }

        if self.influxdb.password.is_some() && self.influxdb.username.is_none() {
            return Err(ConfigError::Validation(
                "password set without a username".to_string(),
            ));
        }

        match self.zenoh.mode.as_str() {
            "client" | "peer" | "router" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "Invalid zenoh mode: {}",
                    other
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let json = "{}";
        let config = ExporterConfig::parse(json).unwrap();

        assert_eq!(config.zenoh.mode, "peer");
        assert_eq!(
            config.influxdb.write_url,
            "http://localhost:8086/write?db=telemetry"
        );
        assert_eq!(config.influxdb.timeout_secs, 10);
        assert!(config.influxdb.username.is_none());
        assert!(config.devices.labels.is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            zenoh: {
                mode: "client",
                connect: ["tcp/localhost:7447"]
            },
            influxdb: {
                write_url: "http://influx.lan:8086/write?db=home",
                username: "telegraf",
                password: "secret",
                timeout_secs: 5
            },
            devices: {
                labels: {
                    "ab123": "garage_heater"
                }
            },
            logging: {
                level: "debug",
                format: "json"
            }
        }"#;

        let config = ExporterConfig::parse(json).unwrap();

        assert_eq!(config.zenoh.mode, "client");
        assert_eq!(config.zenoh.connect, vec!["tcp/localhost:7447"]);
        assert_eq!(
            config.influxdb.write_url,
            "http://influx.lan:8086/write?db=home"
        );
        assert_eq!(config.influxdb.username.as_deref(), Some("telegraf"));
        assert_eq!(config.influxdb.timeout_secs, 5);
        assert_eq!(
            config.devices.labels.get("ab123"),
            Some(&"garage_heater".to_string())
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_zero_timeout() {
        let json = r#"{
            influxdb: { timeout_secs: 0 }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_write_url() {
        let json = r#"{
            influxdb: { write_url: "influx.lan:8086" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid write URL"));
    }

    #[test]
    fn test_validate_password_without_username() {
        let json = r#"{
            influxdb: { password: "secret" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_zenoh_mode() {
        let json = r#"{
            zenoh: { mode: "broker" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(result.is_err());
    }
}
