use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// File looked up in the working directory when `NIMBUS_CONFIG` is unset.
const DEFAULT_CONFIG_FILE: &str = "nimbus.toml";

fn default_path() -> PathBuf {
    std::env::var_os("NIMBUS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Flat environment variables honoured on top of the layered sources.
const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    ("WEATHER_API_URL", "weather.api_url"),
    ("WEATHER_API_KEY", "weather.api_key"),
    ("WEATHER_CACHE_TIMEOUT", "weather.cache_timeout_secs"),
];

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a summary of all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Upstream provider and cache settings
    pub weather: WeatherConfig,

    /// Localization settings
    pub locale: LocaleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP adapter binds to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Unit system requested from the upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Value sent as the provider's `units` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Current-conditions endpoint of the provider
    pub api_url: String,

    /// Provider credential, sent as the `appid` query parameter
    pub api_key: String,

    /// Lifetime of a cached record, in seconds
    pub cache_timeout_secs: u64,

    /// Maximum number of cached records
    pub cache_capacity: u64,

    /// Deadline for one upstream call, in seconds
    pub request_timeout_secs: u64,

    /// Unit system requested from the provider
    pub units: Units,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            cache_timeout_secs: 900,
            cache_capacity: 10_000,
            request_timeout_secs: 10,
            units: Units::Metric,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// When false, records are served untranslated and cached per city only
    pub enabled: bool,

    /// Language used when negotiation finds no supported match
    pub default_language: String,

    /// Languages accepted from `Accept-Language` negotiation
    pub languages: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_language: "en".to_string(),
            languages: vec!["en".to_string(), "ur".to_string(), "ar".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from the default file and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(Some(&default_path()), None)
    }

    /// Load configuration from an optional file and an environment map.
    ///
    /// When `env` is `None` the process environment is used. A missing file
    /// is not an error; every setting has a default.
    pub fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NIMBUS")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("locale.languages")
                .source(env.clone()),
        );

        for (var, key) in LEGACY_OVERRIDES {
            let value = match &env {
                Some(map) => map.get(*var).cloned(),
                None => std::env::var(var).ok(),
            };
            builder = builder
                .set_override_option(*key, value)
                .with_context(|| format!("Failed to apply {}", var))?;
        }

        let config: Config = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        Ok(config)
    }

    /// Load from the default sources and reject invalid settings.
    ///
    /// Validation warnings are logged; errors fail the load.
    pub fn load_validated() -> std::result::Result<Self, ConfigError> {
        Self::load_validated_from(Some(&default_path()), None)
    }

    /// [`Config::load_from`] followed by validation.
    pub fn load_validated_from(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> std::result::Result<Self, ConfigError> {
        let config = Self::load_from(path, env)
            .map_err(|e| ConfigError::ParseError(format!("{:#}", e)))?;

        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if self.server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            result.add_error(
                "server.bind_addr",
                format!("Not a socket address: {}", self.server.bind_addr),
            );
        }

        if self.weather.api_key.trim().is_empty() {
            result.add_warning(
                "weather.api_key",
                "No API key configured - the provider will reject requests",
            );
        }

        if self.weather.cache_timeout_secs == 0 {
            result.add_warning(
                "weather.cache_timeout_secs",
                "Cache timeout is 0 - every request reaches the provider",
            );
        }

        if self.weather.cache_capacity == 0 {
            result.add_error("weather.cache_capacity", "Cache capacity must be greater than 0");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.locale.languages.is_empty() {
            result.add_error("locale.languages", "At least one language is required");
        } else if !self
            .locale
            .languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(&self.locale.default_language))
        {
            result.add_error(
                "locale.default_language",
                format!(
                    "Default language '{}' is not in locale.languages",
                    self.locale.default_language
                ),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }
}
