//! Search controller
//!
//! Owns the search session and drives the renderer from UI events. Everything
//! runs on one task: UI events, the debounce deadline and in-flight provider
//! calls are multiplexed with `tokio::select!`, so no state is shared or
//! locked.
//!
//! Provider calls are pushed into a `FuturesUnordered` tagged with a
//! generation number. A completion is applied only while its generation is
//! still current, so a slow suggestion fetch cannot reopen a list that was
//! dismissed, and an older lookup cannot overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::air_quality::AirQualitySource;
use crate::config::SearchConfig;
use crate::geocoding::Geocoder;
use crate::geolocation::Geolocator;
use crate::models::{AirQualityReport, LocationCandidate};
use crate::renderer::Renderer;
use crate::{AirWatchError, Result};

/// City label used for geolocation lookups
pub const GEOLOCATION_LABEL: &str = "Your Location";

/// Input coming from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The search box text changed
    Input(String),
    /// Explicit search with the current search box text
    Submit,
    /// A suggestion was clicked, by position in the visible list
    SuggestionClicked(usize),
    /// A click landed outside the search widget
    ClickOutside,
    /// Look up the device position
    Locate,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
        }
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
        }
    }
}

/// Suggestion fetch waiting for the input to go quiet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSuggestion {
    pub query: String,
    pub deadline: Instant,
}

/// Transient controller state
#[derive(Debug, Default)]
pub struct SearchSession {
    /// Current search box text, trimmed
    pub query: String,
    /// The single live debounce timer. Replacing it cancels the old one.
    pub debounce: Option<PendingSuggestion>,
    /// Suggestions currently on screen
    pub suggestions: Vec<LocationCandidate>,
    pub loading: bool,
    pub last_error: Option<AirWatchError>,
    suggestion_generation: u64,
    lookup_generation: u64,
}

impl SearchSession {
    fn next_suggestion_generation(&mut self) -> u64 {
        self.suggestion_generation += 1;
        self.suggestion_generation
    }

    fn next_lookup_generation(&mut self) -> u64 {
        self.lookup_generation += 1;
        self.lookup_generation
    }
}

/// Where a committed lookup gets its coordinates from
#[derive(Debug, Clone, PartialEq)]
pub enum LookupTarget {
    /// Explicit search text, resolved through the geocoder
    Query(String),
    /// An already resolved suggestion
    Candidate(LocationCandidate),
    /// The device position
    DevicePosition,
}

/// Resolve a location, fetch its air quality and classify it.
///
/// Stages run strictly in order and the first failure ends the lookup.
pub async fn run_lookup(
    geocoder: &dyn Geocoder,
    air_quality: &dyn AirQualitySource,
    geolocator: &dyn Geolocator,
    target: LookupTarget,
) -> Result<AirQualityReport> {
    let (label, coordinates) = match target {
        LookupTarget::Query(query) => {
            let candidate = geocoder.resolve_one(&query).await?;
            (candidate.short_name.clone(), candidate.coordinates())
        }
        LookupTarget::Candidate(candidate) => {
            (candidate.short_name.clone(), candidate.coordinates())
        }
        LookupTarget::DevicePosition => {
            let position = geolocator.current_position().await?;
            (GEOLOCATION_LABEL.to_string(), position)
        }
    };

    info!(
        "Looking up air quality for {} ({})",
        label,
        coordinates.format_coordinates()
    );
    let reading = air_quality
        .fetch_current(coordinates.latitude, coordinates.longitude)
        .await?;

    Ok(AirQualityReport::new(label, reading))
}

enum Completion {
    Suggestions {
        generation: u64,
        query: String,
        candidates: Vec<LocationCandidate>,
    },
    Lookup {
        generation: u64,
        outcome: Result<AirQualityReport>,
    },
}

pub struct SearchController<R: Renderer> {
    geocoder: Arc<dyn Geocoder>,
    air_quality: Arc<dyn AirQualitySource>,
    geolocator: Arc<dyn Geolocator>,
    renderer: R,
    settings: SearchSettings,
    session: SearchSession,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl<R: Renderer> SearchController<R> {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        air_quality: Arc<dyn AirQualitySource>,
        geolocator: Arc<dyn Geolocator>,
        renderer: R,
        settings: SearchSettings,
    ) -> Self {
        Self {
            geocoder,
            air_quality,
            geolocator,
            renderer,
            settings,
            session: SearchSession::default(),
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Process events until the sender side closes.
    ///
    /// After the channel closes the pending debounce is dropped and calls
    /// already in flight are allowed to finish.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> Self {
        let mut events_open = true;

        loop {
            if !events_open && self.in_flight.is_empty() {
                break;
            }

            let deadline = self.session.debounce.as_ref().map(|pending| pending.deadline);

            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        debug!("Event channel closed");
                        events_open = false;
                        self.session.debounce = None;
                    }
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_debounce();
                }
                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.apply(completion);
                }
            }
        }

        self
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        debug!(?event, "UI event");
        match event {
            UiEvent::Input(text) => self.on_input(&text),
            UiEvent::Submit => self.on_submit(),
            UiEvent::SuggestionClicked(index) => self.on_suggestion_clicked(index),
            UiEvent::ClickOutside => self.dismiss_suggestions(),
            UiEvent::Locate => self.on_locate(),
        }
    }

    fn on_input(&mut self, text: &str) {
        let query = text.trim().to_string();
        self.session.query = query.clone();
        self.session.debounce = None;

        if query.chars().count() < self.settings.min_query_len {
            self.dismiss_suggestions();
            return;
        }

        self.session.debounce = Some(PendingSuggestion {
            query,
            deadline: Instant::now() + self.settings.debounce,
        });
    }

    fn on_submit(&mut self) {
        let query = self.session.query.trim().to_string();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return;
        }
        self.commit(LookupTarget::Query(query));
    }

    fn on_suggestion_clicked(&mut self, index: usize) {
        let Some(candidate) = self.session.suggestions.get(index).cloned() else {
            warn!(
                "Suggestion {} clicked but only {} are shown",
                index,
                self.session.suggestions.len()
            );
            return;
        };

        self.session.query = candidate.short_name.clone();
        self.renderer.set_query_text(&candidate.short_name);
        self.commit(LookupTarget::Candidate(candidate));
    }

    fn on_locate(&mut self) {
        // no position source: report it without touching the loader
        if !self.geolocator.is_supported() {
            self.fail(AirWatchError::UnsupportedCapability);
            return;
        }
        self.commit(LookupTarget::DevicePosition);
    }

    /// Hide the list and invalidate suggestion fetches still in flight
    fn dismiss_suggestions(&mut self) {
        self.session.next_suggestion_generation();
        self.session.suggestions.clear();
        self.renderer.hide_suggestions();
    }

    fn fire_debounce(&mut self) {
        let Some(pending) = self.session.debounce.take() else {
            return;
        };

        let generation = self.session.next_suggestion_generation();
        let geocoder = Arc::clone(&self.geocoder);
        debug!(generation, "Fetching suggestions for '{}'", pending.query);

        self.in_flight.push(Box::pin(async move {
            let candidates = geocoder.suggest(&pending.query).await;
            Completion::Suggestions {
                generation,
                query: pending.query,
                candidates,
            }
        }));
    }

    fn commit(&mut self, target: LookupTarget) {
        self.session.debounce = None;
        self.dismiss_suggestions();

        let generation = self.session.next_lookup_generation();
        self.session.loading = true;
        self.session.last_error = None;
        self.renderer.set_loading(true);
        self.renderer.hide_error();
        self.renderer.hide_results();

        let geocoder = Arc::clone(&self.geocoder);
        let air_quality = Arc::clone(&self.air_quality);
        let geolocator = Arc::clone(&self.geolocator);
        debug!(generation, ?target, "Committing lookup");

        self.in_flight.push(Box::pin(async move {
            let outcome = run_lookup(
                geocoder.as_ref(),
                air_quality.as_ref(),
                geolocator.as_ref(),
                target,
            )
            .await;
            Completion::Lookup {
                generation,
                outcome,
            }
        }));
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Suggestions {
                generation,
                query,
                candidates,
            } => {
                if generation != self.session.suggestion_generation {
                    debug!(generation, "Discarding stale suggestions for '{}'", query);
                    return;
                }

                // short input never reaches the debounce, so only emptiness matters here
                if candidates.is_empty() {
                    self.session.suggestions.clear();
                    self.renderer.hide_suggestions();
                } else {
                    self.renderer.show_suggestions(&candidates);
                    self.session.suggestions = candidates;
                }
            }
            Completion::Lookup {
                generation,
                outcome,
            } => {
                if generation != self.session.lookup_generation {
                    debug!(generation, "Discarding superseded lookup");
                    return;
                }

                match outcome {
                    Ok(report) => {
                        info!(
                            "{}: AQI {} ({})",
                            report.city_label,
                            report.index_text(),
                            report.category
                        );
                        self.session.loading = false;
                        self.renderer.set_loading(false);
                        self.renderer.show_report(&report);
                    }
                    Err(error) => self.fail(error),
                }
            }
        }
    }

    fn fail(&mut self, error: AirWatchError) {
        warn!("Lookup failed: {}", error);
        self.session.loading = false;
        self.renderer.set_loading(false);
        self.renderer.show_error(&error.user_message());
        self.session.last_error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::FixedGeolocator;
    use crate::models::{AirQualityReading, Coordinates};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct OneCity;

    #[async_trait]
    impl Geocoder for OneCity {
        fn provider_name(&self) -> &'static str {
            "one-city"
        }

        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<LocationCandidate>> {
            if query == "Paris" {
                Ok(vec![LocationCandidate::new(
                    "Paris, Île-de-France, France".to_string(),
                    "Paris".to_string(),
                    48.85341,
                    2.3488,
                )])
            } else {
                Ok(Vec::new())
            }
        }
    }

    #[derive(Default)]
    struct RecordingAir {
        calls: Mutex<Vec<(f64, f64)>>,
    }

    #[async_trait]
    impl AirQualitySource for RecordingAir {
        async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<AirQualityReading> {
            self.calls.lock().unwrap().push((latitude, longitude));
            Ok(AirQualityReading {
                timestamp_local: "2024-05-01T14:00".to_string(),
                composite_index: Some(120),
                pm25: Some(40.0),
                pm10: None,
                ozone: None,
                nitrogen_dioxide: None,
            })
        }
    }

    #[tokio::test]
    async fn test_lookup_by_query() {
        let air = RecordingAir::default();
        let report = run_lookup(
            &OneCity,
            &air,
            &FixedGeolocator::default(),
            LookupTarget::Query("Paris".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(report.city_label, "Paris");
        assert_eq!(report.category.label(), "Unhealthy for Sensitive Groups");
        assert_eq!(*air.calls.lock().unwrap(), vec![(48.85341, 2.3488)]);
    }

    #[tokio::test]
    async fn test_lookup_stops_at_geocoding_failure() {
        let air = RecordingAir::default();
        let result = run_lookup(
            &OneCity,
            &air,
            &FixedGeolocator::default(),
            LookupTarget::Query("Nowhereville".to_string()),
        )
        .await;

        assert_eq!(result, Err(AirWatchError::not_found("Nowhereville")));
        assert!(air.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_by_position_uses_fixed_label() {
        let air = RecordingAir::default();
        let geolocator = FixedGeolocator::new(Some(Coordinates::new(35.6895, 139.69171)));
        let report = run_lookup(&OneCity, &air, &geolocator, LookupTarget::DevicePosition)
            .await
            .unwrap();

        assert_eq!(report.city_label, GEOLOCATION_LABEL);
        assert_eq!(*air.calls.lock().unwrap(), vec![(35.6895, 139.69171)]);
    }

    #[tokio::test]
    async fn test_lookup_without_position_source() {
        let air = RecordingAir::default();
        let result = run_lookup(
            &OneCity,
            &air,
            &FixedGeolocator::default(),
            LookupTarget::DevicePosition,
        )
        .await;

        assert_eq!(result, Err(AirWatchError::UnsupportedCapability));
        assert!(air.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_settings_from_config() {
        let config = SearchConfig {
            debounce_ms: 250,
            min_query_len: 3,
        };
        let settings = SearchSettings::from(&config);
        assert_eq!(settings.debounce, Duration::from_millis(250));
        assert_eq!(settings.min_query_len, 3);
    }
}
