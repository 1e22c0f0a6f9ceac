//! Configuration management for the commute service
//!
//! Settings are read once from environment variables at startup, validated,
//! and then shared read-only with every handler.

use crate::TravelError;
use chrono_tz::Tz;
use std::env;

/// Root configuration structure for the commute service
#[derive(Debug, Clone)]
pub struct TravelConfig {
    /// Distance-matrix API key
    pub api_key: String,
    /// Fixed origin address every route starts from
    pub origin: String,
    /// Bind address for the HTTP server
    pub host: String,
    /// Listening port for the HTTP server
    pub port: u16,
    /// Base URL of the distance-matrix API, without trailing slash
    pub api_base_url: String,
    /// Time zone for departure calculation; host local zone when unset
    pub timezone: Option<Tz>,
    /// Default log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log format (pretty or json)
    pub log_format: String,
}

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const ORIGIN_VAR: &str = "ORIGIN_ADDRESS";

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl TravelConfig {
    /// Build a configuration with defaults for everything but the credentials
    pub fn new<K: Into<String>, O: Into<String>>(api_key: K, origin: O) -> Self {
        Self {
            api_key: api_key.into(),
            origin: origin.into(),
            host: default_host(),
            port: default_port(),
            api_base_url: default_api_base_url(),
            timezone: None,
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, TravelError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TravelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR)
            .ok_or_else(|| TravelError::config(format!("Missing {API_KEY_VAR} env var")))?;
        let origin = non_empty(ORIGIN_VAR)
            .ok_or_else(|| TravelError::config(format!("Missing {ORIGIN_VAR} env var")))?;

        let mut config = Self::new(api_key, origin);

        if let Some(host) = non_empty("HOST") {
            config.host = host;
        }
        if let Some(port) = non_empty("PORT") {
            config.port = port.trim().parse().map_err(|_| {
                TravelError::config(format!("PORT must be a valid port number, got '{port}'"))
            })?;
        }
        if let Some(base_url) = non_empty("DISTANCE_MATRIX_BASE_URL") {
            config.api_base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(zone) = non_empty("TIMEZONE") {
            let tz = zone
                .trim()
                .parse::<Tz>()
                .map_err(|_| TravelError::config(format!("Unknown time zone '{zone}'")))?;
            config.timezone = Some(tz);
        }
        if let Some(level) = non_empty("LOG_LEVEL") {
            config.log_level = level.to_lowercase();
        }
        if let Some(format) = non_empty("LOG_FORMAT") {
            config.log_format = format.to_lowercase();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), TravelError> {
        if self.api_key.trim().is_empty() {
            return Err(TravelError::config(format!("{API_KEY_VAR} cannot be empty")));
        }
        if self.origin.trim().is_empty() {
            return Err(TravelError::config(format!("{ORIGIN_VAR} cannot be empty")));
        }
        self.validate_string_values()
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<(), TravelError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(TravelError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.log_format.as_str()) {
            return Err(TravelError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.log_format,
                valid_log_formats.join(", ")
            )));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(TravelError::config(
                "Distance-matrix base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        Ok(())
    }

    /// Address string the server binds to
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
