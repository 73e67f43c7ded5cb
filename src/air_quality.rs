//! Air quality API client for the Open-Meteo air-quality endpoint
//!
//! Each call is a single attempt. Transport, status and parse failures map to
//! [`AirWatchError::Fetch`]; a response without a `current` block maps to
//! [`AirWatchError::NoData`].

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::models::AirQualityReading;
use crate::{AirWatchError, Result};

/// Variables requested in the `current` block
pub const CURRENT_VARIABLES: &str = "us_aqi,pm10,pm2_5,nitrogen_dioxide,ozone";

/// Source of current air-quality conditions
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<AirQualityReading>;
}

/// `OpenMeteo` air-quality response structures
pub mod openmeteo {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct AirQualityResponse {
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
        pub timezone: Option<String>,
        pub current: Option<CurrentAirQuality>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentAirQuality {
        pub time: String,
        pub us_aqi: Option<i64>,
        pub pm10: Option<f64>,
        pub pm2_5: Option<f64>,
        pub nitrogen_dioxide: Option<f64>,
        pub ozone: Option<f64>,
    }
}

impl From<openmeteo::CurrentAirQuality> for AirQualityReading {
    fn from(current: openmeteo::CurrentAirQuality) -> Self {
        AirQualityReading {
            timestamp_local: current.time,
            composite_index: current.us_aqi,
            pm25: current.pm2_5,
            pm10: current.pm10,
            ozone: current.ozone,
            nitrogen_dioxide: current.nitrogen_dioxide,
        }
    }
}

/// Turn a parsed response into a reading, or `NoData` when `current` is absent
pub fn reading_from_response(
    response: openmeteo::AirQualityResponse,
    latitude: f64,
    longitude: f64,
) -> Result<AirQualityReading> {
    response
        .current
        .map(AirQualityReading::from)
        .ok_or_else(|| AirWatchError::no_data(latitude, longitude))
}

pub struct OpenMeteoAirQualityClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoAirQualityClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn current_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latitude={}&longitude={}&current={}&timezone=auto",
            self.base_url, latitude, longitude, CURRENT_VARIABLES
        )
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: Option<String>,
}

#[async_trait]
impl AirQualitySource for OpenMeteoAirQualityClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<AirQualityReading> {
        info!(
            "Getting current air quality for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let start_time = Instant::now();

        let url = self.current_url(latitude, longitude);
        debug!("OpenMeteo air quality request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AirWatchError::fetch(format!("Air quality request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.reason)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            warn!("Air quality API returned {}: {}", status, reason);
            return Err(AirWatchError::fetch(format!(
                "Air quality API error {status}: {reason}"
            )));
        }

        let body: openmeteo::AirQualityResponse = response.json().await.map_err(|e| {
            error!("Failed to parse air quality response: {}", e);
            AirWatchError::fetch(format!("Invalid air quality data: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved air quality in {:.3}s",
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow air quality response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        reading_from_response(body, latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> openmeteo::AirQualityResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_full_current_block() {
        let body = r#"{
            "latitude": 51.5, "longitude": -0.12, "timezone": "Europe/London",
            "current_units": {"us_aqi": "USAQI", "pm2_5": "μg/m³"},
            "current": {"time": "2024-05-01T14:00", "interval": 3600, "us_aqi": 42,
                        "pm10": 12.3, "pm2_5": 8.1, "nitrogen_dioxide": 19.0, "ozone": 61.0}
        }"#;
        let reading = reading_from_response(parse(body), 51.5, -0.12).unwrap();
        assert_eq!(reading.timestamp_local, "2024-05-01T14:00");
        assert_eq!(reading.composite_index, Some(42));
        assert_eq!(reading.pm25, Some(8.1));
        assert_eq!(reading.pm10, Some(12.3));
        assert_eq!(reading.nitrogen_dioxide, Some(19.0));
        assert_eq!(reading.ozone, Some(61.0));
    }

    #[test]
    fn test_partial_current_block() {
        let body = r#"{"current": {"time": "2024-05-01T14:00", "us_aqi": null, "pm10": 12.3, "pm2_5": null}}"#;
        let reading = reading_from_response(parse(body), 0.0, 0.0).unwrap();
        assert_eq!(reading.composite_index, None);
        assert_eq!(reading.pm25, None);
        assert_eq!(reading.pm10, Some(12.3));
        assert_eq!(reading.ozone, None);
    }

    #[test]
    fn test_missing_current_is_no_data() {
        let body = r#"{"latitude": 0.0, "longitude": 0.0, "timezone": "GMT"}"#;
        assert_eq!(
            reading_from_response(parse(body), 10.0, 20.0),
            Err(AirWatchError::no_data(10.0, 20.0))
        );
    }

    #[test]
    fn test_current_url() {
        let client = OpenMeteoAirQualityClient::new(
            reqwest::Client::new(),
            "https://air-quality-api.open-meteo.com/v1/air-quality".to_string(),
        );
        assert_eq!(
            client.current_url(51.5, -0.12),
            "https://air-quality-api.open-meteo.com/v1/air-quality?latitude=51.5&longitude=-0.12&current=us_aqi,pm10,pm2_5,nitrogen_dioxide,ozone&timezone=auto"
        );
    }
}
