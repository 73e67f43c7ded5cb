//! Open-Meteo geocoding adapter (name-and-country records)

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use super::Geocoder;
use crate::models::LocationCandidate;
use crate::{AirWatchError, Result};

/// Geocoding response from `OpenMeteo`. `results` is absent when nothing matched.
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

impl GeocodingResult {
    /// "Name, Region, Country" with missing or repeated parts skipped
    fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        for extra in [self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
        {
            if !extra.is_empty() && !parts.contains(&extra) {
                parts.push(extra);
            }
        }
        parts.join(", ")
    }
}

impl From<GeocodingResult> for LocationCandidate {
    fn from(result: GeocodingResult) -> Self {
        LocationCandidate::new(
            result.display_name(),
            result.name,
            result.latitude,
            result.longitude,
        )
    }
}

impl GeocodingResponse {
    #[must_use]
    pub fn into_candidates(self) -> Vec<LocationCandidate> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .map(LocationCandidate::from)
            .collect()
    }
}

pub struct OpenMeteoGeocoder {
    client: reqwest::Client,
    base_url: String,
    language: String,
    suggestion_limit: usize,
}

impl OpenMeteoGeocoder {
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
            "{}?name={}&count={}&language={}&format=json",
            self.base_url,
            urlencoding::encode(query),
            limit,
            urlencoding::encode(&self.language)
        )
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    fn provider_name(&self) -> &'static str {
        "open-meteo"
    }

    fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }

    #[instrument(skip(self), fields(provider = "open-meteo"))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>> {
        let start_time = Instant::now();
        let url = self.search_url(query, limit);
        debug!("OpenMeteo geocoding request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AirWatchError::lookup(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AirWatchError::lookup(format!(
                "Geocoding API returned status {}",
                response.status()
            )));
        }

        let body: GeocodingResponse = response.json().await.map_err(|e| {
            error!("Failed to parse geocoding response for '{}': {}", query, e);
            AirWatchError::lookup(format!("Invalid geocoding data: {e}"))
        })?;

        let candidates = body.into_candidates();
        info!(
            "Found {} geocoding results for '{}' in {:.3}s",
            candidates.len(),
            query,
            start_time.elapsed().as_secs_f64()
        );
        Ok(candidates)
    }
}
