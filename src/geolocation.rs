//! Device position lookup

use async_trait::async_trait;
use tracing::debug;

use crate::config::GeolocationConfig;
use crate::models::Coordinates;
use crate::{AirWatchError, Result};

/// One-shot position request. No continuous tracking.
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// `UnsupportedCapability` when the environment has no position source,
    /// `Geolocation` when a source exists but refuses or fails.
    async fn current_position(&self) -> Result<Coordinates>;

    /// Whether a position source exists at all
    fn is_supported(&self) -> bool {
        true
    }
}

/// Position taken from configuration
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
}

impl FixedGeolocator {
    #[must_use]
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }

    #[must_use]
    pub fn from_config(config: &GeolocationConfig) -> Self {
        let position = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };
        Self::new(position)
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    fn is_supported(&self) -> bool {
        self.position.is_some()
    }

    async fn current_position(&self) -> Result<Coordinates> {
        let position = self.position.ok_or(AirWatchError::UnsupportedCapability)?;
        debug!("Using configured position {}", position.format_coordinates());
        Ok(position)
    }
}
