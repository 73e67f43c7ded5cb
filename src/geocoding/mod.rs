//! Geocoding
//!
//! One [`Geocoder`] interface over interchangeable providers. Adapters only
//! implement [`Geocoder::search`]; autocomplete (`suggest`) and explicit
//! search (`resolve_one`) are built on top of it with their own failure
//! policies:
//! - `suggest` is best effort and degrades to an empty list
//! - `resolve_one` separates "nothing found" from transport failures

pub mod nominatim;
pub mod open_meteo;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{GeocoderKind, GeocodingConfig};
use crate::models::LocationCandidate;
use crate::{AirWatchError, Result};

pub use nominatim::NominatimGeocoder;
pub use open_meteo::OpenMeteoGeocoder;

/// User agent sent to every provider
pub const USER_AGENT: &str = concat!("AirWatch/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;

    /// Number of candidates requested by [`Geocoder::suggest`]
    fn suggestion_limit(&self) -> usize {
        5
    }

    /// Raw provider search. An empty list means no match, not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>>;

    /// Autocomplete candidates for `query`. Failures are logged and yield an
    /// empty list.
    async fn suggest(&self, query: &str) -> Vec<LocationCandidate> {
        let query = query.trim();
        match self.search(query, self.suggestion_limit()).await {
            Ok(candidates) => {
                debug!(
                    provider = self.provider_name(),
                    "{} suggestions for '{}'",
                    candidates.len(),
                    query
                );
                candidates
            }
            Err(e) => {
                warn!(
                    provider = self.provider_name(),
                    "Error fetching suggestions for '{}': {}", query, e
                );
                Vec::new()
            }
        }
    }

    /// Best single match for an explicit search
    async fn resolve_one(&self, query: &str) -> Result<LocationCandidate> {
        let query = query.trim();
        self.search(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AirWatchError::not_found(query))
    }
}

/// Build an HTTP client shared by the provider adapters
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AirWatchError::config(format!("Failed to create HTTP client: {e}")))
}

/// Select the configured geocoding adapter
#[must_use]
pub fn build_geocoder(config: &GeocodingConfig, client: reqwest::Client) -> Arc<dyn Geocoder> {
    match config.provider {
        GeocoderKind::OpenMeteo => Arc::new(OpenMeteoGeocoder::new(
            client,
            config.open_meteo_url.clone(),
            config.language.clone(),
            config.suggestion_limit,
        )),
        GeocoderKind::Nominatim => Arc::new(NominatimGeocoder::new(
            client,
            config.nominatim_url.clone(),
            config.language.clone(),
            config.suggestion_limit,
        )),
    }
}
