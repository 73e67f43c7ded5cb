//! Data models for the `AirWatch` application
//!
//! - Location: geocoding candidates and coordinates
//! - Air quality: readings, pollutant gauges and the rendered report

pub mod air_quality;
pub mod location;

pub use air_quality::{AirQualityReading, AirQualityReport, Pollutant, PollutantGauge};
pub use location::{Coordinates, LocationCandidate};
