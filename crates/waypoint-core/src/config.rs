use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::retry::RetryConfig;

/// Environment variable holding the geocoding (suggestion) access token
pub const MAPBOX_TOKEN_ENV: &str = "WAYPOINT_MAPBOX_TOKEN";
/// Environment variable holding the weather provider API key
pub const OPENWEATHER_KEY_ENV: &str = "WAYPOINT_OPENWEATHER_KEY";
/// Environment variable holding the text-generation API key
pub const GEMINI_KEY_ENV: &str = "WAYPOINT_GEMINI_KEY";

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

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider endpoints and credentials
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Suggestion and query behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Place listing settings
    #[serde(default)]
    pub places: PlacesConfig,

    /// Retry policy for transient provider failures
    #[serde(default)]
    pub retry: RetrySettings,
}

/// External provider settings.
///
/// Credentials are never read from or written to the config file; they are
/// injected from the environment by [`Config::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the Mapbox-compatible geocoding API
    pub geocoding_base_url: String,

    /// Base URL of the OpenWeather-compatible API
    pub weather_base_url: String,

    /// Base URL of the Gemini-compatible text-generation API
    pub text_generation_base_url: String,

    /// Text-generation model name
    pub text_generation_model: String,

    #[serde(skip)]
    pub mapbox_token: Option<String>,

    #[serde(skip)]
    pub openweather_api_key: Option<String>,

    #[serde(skip)]
    pub gemini_api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: "https://api.mapbox.com".to_string(),
            weather_base_url: "https://api.openweathermap.org".to_string(),
            text_generation_base_url: "https://generativelanguage.googleapis.com".to_string(),
            text_generation_model: "gemini-1.5-flash".to_string(),
            mapbox_token: None,
            openweather_api_key: None,
            gemini_api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a suggestion lookup fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Inputs shorter than this skip the lookup and clear suggestions
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum number of suggestions requested from the provider
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Per-request timeout for every provider call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Geocoding place-type filter
    #[serde(default = "default_place_types")]
    pub place_types: String,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_chars() -> usize {
    2
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_place_types() -> String {
    "place".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            suggestion_limit: default_suggestion_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            place_types: default_place_types(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Number of attractions requested in the prompt
    #[serde(default = "default_max_places")]
    pub max_places: usize,
}

fn default_max_places() -> usize {
    10
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            max_places: default_max_places(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    1
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    2000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries, self.initial_delay_ms, self.max_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProviderConfig::default(),
            search: SearchConfig::default(),
            places: PlacesConfig::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if it doesn't exist. Credentials are then read from the environment.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from an explicit path, writing defaults when missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Returns an error if validation fails with critical errors; warnings
    /// are logged and returned.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Pull provider credentials from the environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        self.providers.mapbox_token = read(MAPBOX_TOKEN_ENV);
        self.providers.openweather_api_key = read(OPENWEATHER_KEY_ENV);
        self.providers.gemini_api_key = read(GEMINI_KEY_ENV);
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.providers.geocoding_base_url,
            "providers.geocoding_base_url",
            &mut result,
        );
        self.validate_url(
            &self.providers.weather_base_url,
            "providers.weather_base_url",
            &mut result,
        );
        self.validate_url(
            &self.providers.text_generation_base_url,
            "providers.text_generation_base_url",
            &mut result,
        );

        if self.providers.text_generation_model.trim().is_empty() {
            result.add_error(
                "providers.text_generation_model",
                "Model name must not be empty",
            );
        }

        if self.search.suggestion_limit == 0 {
            result.add_error(
                "search.suggestion_limit",
                "Suggestion limit must be greater than 0",
            );
        } else if self.search.suggestion_limit > 10 {
            // Mapbox rejects limits above 10
            result.add_error("search.suggestion_limit", "Suggestion limit cannot exceed 10");
        }

        if self.search.request_timeout_secs == 0 {
            result.add_error(
                "search.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.search.request_timeout_secs > 60 {
            result.add_warning(
                "search.request_timeout_secs",
                "Request timeout is unusually long (>60s)",
            );
        }

        if self.search.debounce_ms == 0 {
            result.add_warning(
                "search.debounce_ms",
                "Debounce disabled; every keystroke triggers a lookup",
            );
        }

        if self.search.min_query_chars == 0 {
            result.add_warning(
                "search.min_query_chars",
                "Empty input will trigger suggestion lookups",
            );
        }

        if self.places.max_places == 0 {
            result.add_error("places.max_places", "Must request at least one place");
        }

        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            result.add_warning(
                "retry.max_delay_ms",
                "Max retry delay is shorter than the initial delay",
            );
        }

        let credentials = [
            (MAPBOX_TOKEN_ENV, &self.providers.mapbox_token, "suggestions"),
            (OPENWEATHER_KEY_ENV, &self.providers.openweather_api_key, "weather"),
            (GEMINI_KEY_ENV, &self.providers.gemini_api_key, "place listings"),
        ];
        for (env, value, feature) in credentials {
            if value.is_none() {
                result.add_warning(env, format!("Not set - {} will be unavailable", feature));
            }
        }

        result
    }

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

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path. Credentials are never written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("waypoint");

        Ok(config_dir.join("config.toml"))
    }
}
