//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use crate::projection::ProjectionSettings;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the travel planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Dataset locations
    #[serde(default)]
    pub data: DataConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Map framing constants
    #[serde(default)]
    pub projection: ProjectionSettings,
}

/// Dataset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Trips CSV file
    #[serde(default = "default_trips_path")]
    pub trips_path: PathBuf,
    /// City coordinates CSV file
    #[serde(default = "default_coordinates_path")]
    pub coordinates_path: PathBuf,
    /// Directory with the per-route GeoJSON files
    #[serde(default = "default_routes_dir")]
    pub routes_dir: PathBuf,
    /// City that always comes first in route file names
    #[serde(default = "default_pinned_route_city")]
    pub pinned_route_city: Option<String>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Front-end assets served for non-API paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_trips_path() -> PathBuf {
    PathBuf::from("data/trips_data.csv")
}

fn default_coordinates_path() -> PathBuf {
    PathBuf::from("data/coordinates.csv")
}

fn default_routes_dir() -> PathBuf {
    PathBuf::from("geojson_files")
}

fn default_pinned_route_city() -> Option<String> {
    Some("Amsterdam".to_string())
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            trips_path: default_trips_path(),
            coordinates_path: default_coordinates_path(),
            routes_dir: default_routes_dir(),
            pinned_route_city: default_pinned_route_city(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            projection: ProjectionSettings::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVELPLANNER__SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPLANNER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelplanner").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.data.trips_path.as_os_str().is_empty() {
            self.data.trips_path = default_trips_path();
        }
        if self.data.coordinates_path.as_os_str().is_empty() {
            self.data.coordinates_path = default_coordinates_path();
        }
        if self.data.routes_dir.as_os_str().is_empty() {
            self.data.routes_dir = default_routes_dir();
        }
        if self
            .data
            .pinned_route_city
            .as_deref()
            .is_some_and(|city| city.trim().is_empty())
        {
            self.data.pinned_route_city = None;
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_string_values()?;
        self.projection
            .validate()
            .with_context(|| "Invalid [projection] settings")?;
        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            return Err(PlannerError::config(format!(
                "Server host '{}' must be an IP address",
                self.server.host
            ))
            .into());
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
