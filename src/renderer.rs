//! Presentation contract driven by the search controller.
//!
//! The controller never touches presentation nodes; it only calls these
//! methods. Implementations decide how "visible" and "hidden" look.

use crate::models::{AirQualityReport, LocationCandidate};

pub trait Renderer: Send {
    /// Toggle the loading indicator. `true` also hides the result container.
    fn set_loading(&mut self, loading: bool);

    /// Show an error and hide results
    fn show_error(&mut self, message: &str);

    fn hide_error(&mut self);

    fn hide_results(&mut self);

    /// Paint the result card and make it visible
    fn show_report(&mut self, report: &AirQualityReport);

    /// Replace the suggestion list and make it visible
    fn show_suggestions(&mut self, suggestions: &[LocationCandidate]);

    fn hide_suggestions(&mut self);

    /// Write text back into the search input
    fn set_query_text(&mut self, text: &str);
}
