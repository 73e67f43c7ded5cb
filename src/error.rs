//! Error types and handling for the `AirWatch` lookup pipeline

use thiserror::Error;

/// Main error type for the `AirWatch` library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirWatchError {
    /// An explicit search returned no geocoding candidates
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    /// Geocoding transport or parse failure
    #[error("Geocoding lookup failed: {message}")]
    Lookup { message: String },

    /// Air-quality provider answered without a current-conditions payload
    #[error("No current air quality data for ({latitude:.4}, {longitude:.4})")]
    NoData { latitude: f64, longitude: f64 },

    /// Air-quality transport or parse failure
    #[error("Air quality fetch failed: {message}")]
    Fetch { message: String },

    /// The device denied or failed to provide a position
    #[error("Geolocation failed: {message}")]
    Geolocation { message: String },

    /// Geolocation is not available in this environment
    #[error("Geolocation is not supported")]
    UnsupportedCapability,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AirWatchError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new geocoding lookup error
    pub fn lookup<S: Into<String>>(message: S) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    /// Create a new no-data error
    #[must_use]
    pub fn no_data(latitude: f64, longitude: f64) -> Self {
        Self::NoData {
            latitude,
            longitude,
        }
    }

    /// Create a new air-quality fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a new geolocation error
    pub fn geolocation<S: Into<String>>(message: S) -> Self {
        Self::Geolocation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirWatchError::NotFound { .. } => "City not found.".to_string(),
            AirWatchError::Lookup { .. } => "Error searching for city.".to_string(),
            AirWatchError::NoData { .. } => {
                "No air quality data available for this location.".to_string()
            }
            AirWatchError::Fetch { .. } => "Failed to fetch AQI data.".to_string(),
            AirWatchError::Geolocation { .. } => "Unable to retrieve your location.".to_string(),
            AirWatchError::UnsupportedCapability => {
                "Geolocation is not supported on this device.".to_string()
            }
            AirWatchError::Config { message } => format!("Configuration error: {message}"),
        }
    }
}
