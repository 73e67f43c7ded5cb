//! Air quality reading, pollutant gauges and the report handed to renderers

use crate::classifier::{Category, classify};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Shown in place of a missing concentration
pub const PLACEHOLDER: &str = "--";

/// Concentration unit reported by the provider
pub const CONCENTRATION_UNIT: &str = "µg/m³";

/// One fetch worth of current conditions. Every value may be missing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualityReading {
    /// Provider-local timestamp, e.g. `2024-05-01T14:00`
    pub timestamp_local: String,
    /// US AQI composite index
    pub composite_index: Option<i64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub ozone: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
}

impl AirQualityReading {
    /// Concentration of a single pollutant
    #[must_use]
    pub fn concentration(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Ozone => self.ozone,
            Pollutant::NitrogenDioxide => self.nitrogen_dioxide,
        }
    }

    /// Human readable "last updated" time, falling back to the raw string
    #[must_use]
    pub fn format_timestamp(&self) -> String {
        NaiveDateTime::parse_from_str(&self.timestamp_local, "%Y-%m-%dT%H:%M")
            .map(|time| time.format("%b %-d, %Y %H:%M").to_string())
            .unwrap_or_else(|_| self.timestamp_local.clone())
    }
}

/// Pollutants shown as gauges, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pollutant {
    Pm25,
    Pm10,
    Ozone,
    NitrogenDioxide,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::Ozone,
        Pollutant::NitrogenDioxide,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Ozone => "O₃",
            Pollutant::NitrogenDioxide => "NO₂",
        }
    }

    /// Gauge ceiling in µg/m³
    #[must_use]
    pub fn reference_max(self) -> f64 {
        match self {
            Pollutant::Pm25 => 250.0,
            Pollutant::Pm10 => 425.0,
            Pollutant::Ozone => 400.0,
            Pollutant::NitrogenDioxide => 400.0,
        }
    }
}

/// Gauge position in percent, clamped to 0..=100. Missing values sit at 0.
#[must_use]
pub fn gauge_percentage(value: Option<f64>, reference_max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && reference_max > 0.0 => {
            (v / reference_max * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// Concentration text, or the placeholder when absent
#[must_use]
pub fn format_concentration(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v} {CONCENTRATION_UNIT}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Display-ready gauge for one pollutant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantGauge {
    pub pollutant: Pollutant,
    pub text: String,
    pub percentage: f64,
}

impl PollutantGauge {
    #[must_use]
    pub fn new(pollutant: Pollutant, value: Option<f64>) -> Self {
        Self {
            pollutant,
            text: format_concentration(value),
            percentage: gauge_percentage(value, pollutant.reference_max()),
        }
    }
}

/// Everything a renderer needs for the result card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    pub city_label: String,
    pub timestamp_local: String,
    pub reading: AirQualityReading,
    pub category: Category,
    pub gauges: Vec<PollutantGauge>,
}

impl AirQualityReport {
    /// Classify a reading and lay out its gauges
    #[must_use]
    pub fn new(city_label: String, reading: AirQualityReading) -> Self {
        let category = classify(reading.composite_index);
        let gauges = Pollutant::ALL
            .iter()
            .map(|&pollutant| PollutantGauge::new(pollutant, reading.concentration(pollutant)))
            .collect();

        Self {
            city_label,
            timestamp_local: reading.format_timestamp(),
            reading,
            category,
            gauges,
        }
    }

    /// AQI value as text, "--" when the provider sent none
    #[must_use]
    pub fn index_text(&self) -> String {
        self.reading
            .composite_index
            .map_or_else(|| PLACEHOLDER.to_string(), |index| index.to_string())
    }

    #[must_use]
    pub fn gauge(&self, pollutant: Pollutant) -> Option<&PollutantGauge> {
        self.gauges.iter().find(|gauge| gauge.pollutant == pollutant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> AirQualityReading {
        AirQualityReading {
            timestamp_local: "2024-05-01T14:00".to_string(),
            composite_index: Some(75),
            pm25: None,
            pm10: Some(21.4),
            ozone: Some(400.0),
            nitrogen_dioxide: Some(0.0),
        }
    }

    #[test]
    fn test_gauge_percentage_clamps() {
        assert_eq!(gauge_percentage(Some(0.0), 250.0), 0.0);
        assert_eq!(gauge_percentage(Some(250.0), 250.0), 100.0);
        assert_eq!(gauge_percentage(Some(500.0), 250.0), 100.0);
        assert_eq!(gauge_percentage(Some(125.0), 250.0), 50.0);
        assert_eq!(gauge_percentage(None, 250.0), 0.0);
    }

    #[test]
    fn test_gauge_percentage_is_monotonic() {
        let max = Pollutant::Pm10.reference_max();
        let mut previous = 0.0;
        for step in 0..=100 {
            let value = f64::from(step) * 10.0;
            let pct = gauge_percentage(Some(value), max);
            assert!(pct >= previous, "{pct} < {previous} at {value}");
            previous = pct;
        }
    }

    #[test]
    fn test_missing_pm25_renders_placeholder() {
        let report = AirQualityReport::new("London".to_string(), reading());

        let pm25 = report.gauge(Pollutant::Pm25).unwrap();
        assert_eq!(pm25.text, "--");
        assert_eq!(pm25.percentage, 0.0);

        let pm10 = report.gauge(Pollutant::Pm10).unwrap();
        assert_eq!(pm10.text, "21.4 µg/m³");
        assert!(pm10.percentage > 0.0);

        assert_eq!(report.gauge(Pollutant::Ozone).unwrap().percentage, 100.0);
    }

    #[test]
    fn test_zero_concentration_is_not_placeholder() {
        let report = AirQualityReport::new("London".to_string(), reading());
        let no2 = report.gauge(Pollutant::NitrogenDioxide).unwrap();
        assert_eq!(no2.text, "0 µg/m³");
        assert_eq!(no2.percentage, 0.0);
    }

    #[test]
    fn test_report_classifies_index() {
        let report = AirQualityReport::new("London".to_string(), reading());
        assert_eq!(report.category, Category::Moderate);
        assert_eq!(report.index_text(), "75");
        assert_eq!(report.timestamp_local, "May 1, 2024 14:00");
        assert_eq!(report.gauges.len(), 4);
    }

    #[test]
    fn test_timestamp_falls_back_to_raw() {
        let mut r = reading();
        r.timestamp_local = "sometime".to_string();
        assert_eq!(r.format_timestamp(), "sometime");
    }
}
