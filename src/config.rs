//! Process configuration
//!
//! Loaded once at startup from environment variables (and a `.env` file if
//! present), then shared read-only for the lifetime of the process.

use std::env;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub const DEFAULT_SMS_API_BASE_URL: &str = "https://www.fast2sms.com";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Configuration for the SOS relay.
#[derive(Clone)]
pub struct Config {
    /// Gateway credential (required)
    pub sms_api_key: String,

    /// Gateway base URL
    pub sms_api_base_url: String,

    /// Gateway route code (default: "q")
    pub sms_route: String,

    /// Gateway language tag (default: "english")
    pub sms_language: String,

    /// Origins allowed to call the API cross-origin
    pub allowed_origins: Vec<String>,

    /// Listen address (default: 127.0.0.1)
    pub host: IpAddr,

    /// Listen port (default: 3000)
    pub port: u16,

    /// Rate limiter window (default: 15 minutes)
    pub rate_limit_window: Duration,

    /// Requests allowed per client address per window (default: 100)
    pub rate_limit_max: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `SMS_API_KEY`: gateway credential
    ///
    /// Optional environment variables:
    /// - `SMS_API_BASE_URL`: gateway base URL (default: https://www.fast2sms.com)
    /// - `SMS_ROUTE`: route code (default: "q")
    /// - `SMS_LANGUAGE`: language tag (default: "english")
    /// - `ALLOWED_ORIGINS`: comma-separated origins (default: http://localhost:3000)
    /// - `HOST`: listen address (default: 127.0.0.1)
    /// - `PORT`: listen port (default: 3000)
    /// - `RATE_LIMIT_WINDOW_SECS`: limiter window (default: 900)
    /// - `RATE_LIMIT_MAX`: requests per window (default: 100)
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sms_api_key = var("SMS_API_KEY")
            .ok_or_else(|| ConfigError::MissingVar("SMS_API_KEY".to_string()))?;

        if sms_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "SMS_API_KEY".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let sms_api_base_url =
            var("SMS_API_BASE_URL").unwrap_or_else(|| DEFAULT_SMS_API_BASE_URL.to_string());
        if !is_http_url(&sms_api_base_url) {
            return Err(ConfigError::InvalidValue {
                var: "SMS_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let sms_route = var("SMS_ROUTE").unwrap_or_else(|| "q".to_string());
        let sms_language = var("SMS_LANGUAGE").unwrap_or_else(|| "english".to_string());

        let allowed_origins = Self::parse_origins(
            &var("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
        )?;

        let host = match var("HOST") {
            Some(val) => val.parse::<IpAddr>().map_err(|_| ConfigError::InvalidValue {
                var: "HOST".to_string(),
                reason: format!("Must be an IP address, got: {}", val),
            })?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = Self::parse_var("PORT", var("PORT"), 3000u16)?;

        let window_secs = Self::parse_var(
            "RATE_LIMIT_WINDOW_SECS",
            var("RATE_LIMIT_WINDOW_SECS"),
            15 * 60u64,
        )?;
        if window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "RATE_LIMIT_WINDOW_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let rate_limit_max = Self::parse_var("RATE_LIMIT_MAX", var("RATE_LIMIT_MAX"), 100u32)?;
        if rate_limit_max == 0 {
            return Err(ConfigError::InvalidValue {
                var: "RATE_LIMIT_MAX".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(Config {
            sms_api_key,
            sms_api_base_url,
            sms_route,
            sms_language,
            allowed_origins,
            host,
            port,
            rate_limit_window: Duration::from_secs(window_secs),
            rate_limit_max,
        })
    }

    /// Parse an optional numeric variable with a default value.
    fn parse_var<T: std::str::FromStr>(name: &str, value: Option<String>, default: T) -> ConfigResult<T> {
        match value {
            Some(val) => val.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            None => Ok(default),
        }
    }

    /// Split a comma-separated origin list, rejecting anything that is not
    /// a bare http(s) origin.
    fn parse_origins(raw: &str) -> ConfigResult<Vec<String>> {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "ALLOWED_ORIGINS".to_string(),
                reason: "At least one origin is required".to_string(),
            });
        }

        for origin in &origins {
            let host = origin
                .strip_prefix("http://")
                .or_else(|| origin.strip_prefix("https://"));
            match host {
                Some(host) if !host.is_empty() && !host.contains('/') => {}
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "ALLOWED_ORIGINS".to_string(),
                        reason: format!("Not a valid origin: {}", origin),
                    })
                }
            }
        }

        Ok(origins)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("sms_api_key", &"<redacted>")
            .field("sms_api_base_url", &self.sms_api_base_url)
            .field("sms_route", &self.sms_route)
            .field("sms_language", &self.sms_language)
            .field("allowed_origins", &self.allowed_origins)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("rate_limit_max", &self.rate_limit_max)
            .finish()
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
