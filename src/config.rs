//! Configuration management for `AirWatch`
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and validates every setting before the controller is built.

use crate::AirWatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `AirWatch` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AirWatchConfig {
    /// Geocoding provider configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Air quality provider configuration
    #[serde(default)]
    pub air_quality: AirQualityConfig,
    /// Search box behaviour
    #[serde(default)]
    pub search: SearchConfig,
    /// Device position used by the locate command
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which geocoding backend answers place searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeocoderKind {
    /// Name-and-country records from the Open-Meteo geocoding API
    #[default]
    OpenMeteo,
    /// Address-string records from OpenStreetMap Nominatim
    Nominatim,
}

/// Geocoding configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default)]
    pub provider: GeocoderKind,
    /// Open-Meteo geocoding search endpoint
    #[serde(default = "default_open_meteo_geocoding_url")]
    pub open_meteo_url: String,
    /// Nominatim search endpoint
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    /// Result language requested from the provider
    #[serde(default = "default_language")]
    pub language: String,
    /// Maximum number of autocomplete suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

/// Air quality API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityConfig {
    /// Open-Meteo air-quality endpoint
    #[serde(default = "default_air_quality_url")]
    pub base_url: String,
}

/// Search box settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before suggestions are fetched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Shortest trimmed query that triggers suggestions
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

/// Fixed device position. Leaving both fields unset disables geolocation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeolocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
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
fn default_open_meteo_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderKind::default(),
            open_meteo_url: default_open_meteo_geocoding_url(),
            nominatim_url: default_nominatim_url(),
            language: default_language(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            base_url: default_air_quality_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
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

impl AirWatchConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

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

        // AIRWATCH_SEARCH__DEBOUNCE_MS=250 style overrides
        builder = builder.add_source(
            Environment::with_prefix("AIRWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airwatch").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.open_meteo_url.is_empty() {
            self.geocoding.open_meteo_url = default_open_meteo_geocoding_url();
        }
        if self.geocoding.nominatim_url.is_empty() {
            self.geocoding.nominatim_url = default_nominatim_url();
        }
        if self.geocoding.language.is_empty() {
            self.geocoding.language = default_language();
        }
        if self.air_quality.base_url.is_empty() {
            self.air_quality.base_url = default_air_quality_url();
        }
        if self.search.min_query_len == 0 {
            self.search.min_query_len = default_min_query_len();
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
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_geolocation()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=20).contains(&self.geocoding.suggestion_limit) {
            return Err(AirWatchError::config(
                "Suggestion limit must be between 1 and 20",
            )
            .into());
        }

        if self.search.debounce_ms == 0 {
            return Err(AirWatchError::config("Debounce interval cannot be zero").into());
        }

        if self.search.debounce_ms > 5000 {
            return Err(
                AirWatchError::config("Debounce interval cannot exceed 5000 ms").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirWatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirWatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Open-Meteo geocoding", &self.geocoding.open_meteo_url),
            ("Nominatim", &self.geocoding.nominatim_url),
            ("Air quality", &self.air_quality.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AirWatchError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_geolocation(&self) -> Result<()> {
        match (self.geolocation.latitude, self.geolocation.longitude) {
            (None, None) => Ok(()),
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(AirWatchError::config(format!(
                        "Latitude must be between -90 and 90, got: {lat}"
                    ))
                    .into());
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(AirWatchError::config(format!(
                        "Longitude must be between -180 and 180, got: {lon}"
                    ))
                    .into());
                }
                Ok(())
            }
            _ => Err(AirWatchError::config(
                "Geolocation needs both latitude and longitude, or neither",
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AirWatchConfig::default();
        assert_eq!(config.geocoding.provider, GeocoderKind::OpenMeteo);
        assert_eq!(config.geocoding.suggestion_limit, 5);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.logging.level, "info");
        assert!(config.geolocation.latitude.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AirWatchConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AirWatchConfig::default();
        config.geocoding.suggestion_limit = 0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Suggestion limit"));

        let mut config = AirWatchConfig::default();
        config.search.debounce_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_half_position() {
        let mut config = AirWatchConfig::default();
        config.geolocation.latitude = Some(51.5);
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("both latitude"));

        config.geolocation.longitude = Some(-0.12);
        assert!(config.validate().is_ok());

        config.geolocation.latitude = Some(91.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_bad_url() {
        let mut config = AirWatchConfig::default();
        config.air_quality.base_url = "ftp://example.org".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Air quality URL"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("airwatch-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[geocoding]\nprovider = \"nominatim\"\nsuggestion_limit = 3\n\n[geolocation]\nlatitude = 48.85\nlongitude = 2.35\n"
        )
        .unwrap();

        let config = AirWatchConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.geocoding.provider, GeocoderKind::Nominatim);
        assert_eq!(config.geocoding.suggestion_limit, 3);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.geolocation.latitude, Some(48.85));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AirWatchConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("airwatch"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
