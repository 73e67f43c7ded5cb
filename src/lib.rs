//! `AirWatch` - air quality lookup and health advisories
//!
//! This library provides place search with debounced autocomplete, current
//! air-quality retrieval, and the AQI classification that drives the rendered
//! advisory.

pub mod air_quality;
pub mod classifier;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod geocoding;
pub mod geolocation;
pub mod logging;
pub mod models;
pub mod renderer;

// Re-export core types for public API
pub use air_quality::{AirQualitySource, OpenMeteoAirQualityClient};
pub use classifier::{Category, classify};
pub use config::AirWatchConfig;
pub use controller::{LookupTarget, SearchController, SearchSession, SearchSettings, UiEvent};
pub use error::AirWatchError;
pub use geocoding::{Geocoder, NominatimGeocoder, OpenMeteoGeocoder};
pub use geolocation::{FixedGeolocator, Geolocator};
pub use models::{AirQualityReading, AirQualityReport, Coordinates, LocationCandidate};
pub use renderer::Renderer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
