//! Nominatim geocoding adapter (address-string records)
//!
//! Nominatim answers with a flat array of places whose `display_name` is the
//! full comma-separated address and whose coordinates are strings.

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use super::Geocoder;
use crate::models::LocationCandidate;
use crate::models::location::{short_name_for, simplify_display_name};
use crate::{AirWatchError, Result};

#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl NominatimPlace {
    /// Convert to a candidate, `query` being the fallback short name
    pub fn into_candidate(self, query: &str) -> Result<LocationCandidate> {
        let latitude = self.lat.trim().parse::<f64>().map_err(|e| {
            AirWatchError::lookup(format!("Invalid latitude '{}': {e}", self.lat))
        })?;
        let longitude = self.lon.trim().parse::<f64>().map_err(|e| {
            AirWatchError::lookup(format!("Invalid longitude '{}': {e}", self.lon))
        })?;

        let short_name = short_name_for(self.name.as_deref(), &self.display_name, query);
        Ok(LocationCandidate::new(
            simplify_display_name(&self.display_name),
            short_name,
            latitude,
            longitude,
        ))
    }
}

/// Convert a whole response, failing on the first malformed record
pub fn into_candidates(places: Vec<NominatimPlace>, query: &str) -> Result<Vec<LocationCandidate>> {
    places
        .into_iter()
        .map(|place| place.into_candidate(query))
        .collect()
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    language: String,
    suggestion_limit: usize,
}

impl NominatimGeocoder {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        language: String,
        suggestion_limit: usize,
    ) -> Self {
        Self {
            client,
            base_url,
            language,
            suggestion_limit,
        }
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}?q={}&format=jsonv2&limit={}&accept-language={}",
            self.base_url,
            urlencoding::encode(query),
            limit,
            urlencoding::encode(&self.language)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    fn provider_name(&self) -> &'static str {
        "nominatim"
    }

    fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }

    #[instrument(skip(self), fields(provider = "nominatim"))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>> {
        let start_time = Instant::now();
        let url = self.search_url(query, limit);
        debug!("Nominatim request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AirWatchError::lookup(format!("Nominatim request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AirWatchError::lookup(format!(
                "Nominatim returned status {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            error!("Failed to parse Nominatim response for '{}': {}", query, e);
            AirWatchError::lookup(format!("Invalid Nominatim data: {e}"))
        })?;

        let candidates = into_candidates(places, query)?;
        info!(
            "Found {} Nominatim results for '{}' in {:.3}s",
            candidates.len(),
            query,
            start_time.elapsed().as_secs_f64()
        );
        Ok(candidates)
    }
}
