//! Location model for geocoding candidates and raw coordinates

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a coordinates string for logs
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A geocoding provider's proposed match for a free-text query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationCandidate {
    /// Label shown in the suggestion list
    pub display_name: String,
    /// Name carried into the result card and the search box
    pub short_name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl LocationCandidate {
    #[must_use]
    pub fn new(display_name: String, short_name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            display_name,
            short_name,
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Collapse a verbose comma-separated address.
///
/// More than three parts keep the first two plus the last one.
#[must_use]
pub fn simplify_display_name(display_name: &str) -> String {
    let parts: Vec<&str> = display_name
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() > 3 {
        format!("{}, {}, {}", parts[0], parts[1], parts[parts.len() - 1])
    } else {
        display_name.trim().to_string()
    }
}

/// Pick the name handed downstream: the provider's place name, else the first
/// address part, else the raw query.
#[must_use]
pub fn short_name_for(place_name: Option<&str>, display_name: &str, query: &str) -> String {
    place_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| {
            display_name
                .split(',')
                .map(str::trim)
                .find(|part| !part.is_empty())
        })
        .unwrap_or(query)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_long_address() {
        let name = "Westminster, London, Greater London, England, United Kingdom";
        assert_eq!(
            simplify_display_name(name),
            "Westminster, London, United Kingdom"
        );
    }

    #[test]
    fn test_simplify_keeps_short_address() {
        assert_eq!(
            simplify_display_name("London, England, United Kingdom"),
            "London, England, United Kingdom"
        );
        assert_eq!(simplify_display_name("Paris"), "Paris");
    }

    #[test]
    fn test_short_name_fallbacks() {
        assert_eq!(short_name_for(Some("Berlin"), "Mitte, Berlin, Germany", "ber"), "Berlin");
        assert_eq!(short_name_for(Some("  "), "Mitte, Berlin, Germany", "ber"), "Mitte");
        assert_eq!(short_name_for(None, "Mitte, Berlin, Germany", "ber"), "Mitte");
        assert_eq!(short_name_for(None, "", "ber"), "ber");
    }

    #[test]
    fn test_candidate_coordinates() {
        let candidate = LocationCandidate::new(
            "London, United Kingdom".to_string(),
            "London".to_string(),
            51.50853,
            -0.12574,
        );
        assert_eq!(candidate.coordinates().format_coordinates(), "51.5085, -0.1257");
    }
}
