//! Terminal front end: stdin commands in, text cards out

use std::io::Write;

use crate::controller::UiEvent;
use crate::models::{AirQualityReport, LocationCandidate};
use crate::renderer::Renderer;

/// Width of the text gauge bar
const GAUGE_WIDTH: usize = 20;

pub const HELP: &str = "\
Type to search (suggestions appear after a short pause).
  /search [text]  search for text, or for what you typed last
  /pick <n>       choose suggestion n
  /dismiss        close the suggestion list
  /locate         use the configured device position
  /quit           exit";

/// A parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Events(Vec<UiEvent>),
    Help,
    Quit,
    Invalid(String),
}

/// Translate one stdin line into controller events
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Command::Events(vec![UiEvent::Input(line.to_string())]);
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    match name {
        "search" if argument.is_empty() => Command::Events(vec![UiEvent::Submit]),
        "search" => Command::Events(vec![
            UiEvent::Input(argument.to_string()),
            UiEvent::Submit,
        ]),
        "pick" => match argument.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Events(vec![UiEvent::SuggestionClicked(n - 1)]),
            _ => Command::Invalid(format!("'/pick' needs a suggestion number, got '{argument}'")),
        },
        "dismiss" => Command::Events(vec![UiEvent::ClickOutside]),
        "locate" => Command::Events(vec![UiEvent::Locate]),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("Unknown command '/{other}'")),
    }
}

/// Text bar such as `[#####...............]`
#[must_use]
pub fn gauge_bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(GAUGE_WIDTH - filled))
}

/// Format the result card
#[must_use]
pub fn format_report(report: &AirQualityReport) -> String {
    let category = report.category;
    let mut lines = vec![
        format!("== {} ==", report.city_label),
        format!("Last updated: {}", report.timestamp_local),
        format!(
            "AQI {}  {}{}",
            report.index_text(),
            category.label(),
            category
                .theme()
                .map(|theme| format!(" [{theme}]"))
                .unwrap_or_default()
        ),
        category.implication().to_string(),
        String::new(),
    ];

    for gauge in &report.gauges {
        lines.push(format!(
            "{:<6} {:>14} {} {:>3.0}%",
            gauge.pollutant.label(),
            gauge.text,
            gauge_bar(gauge.percentage),
            gauge.percentage
        ));
    }

    lines.push(String::new());
    lines.push("Health tips:".to_string());
    lines.extend(category.health_tips().iter().map(|tip| format!("  - {tip}")));
    lines.push("Eco tips:".to_string());
    lines.extend(category.eco_tips().iter().map(|tip| format!("  - {tip}")));

    lines.join("\n")
}

/// Renderer writing plain text to any writer, stdout by default
pub struct ConsoleRenderer<W: Write + Send> {
    out: W,
}

impl ConsoleRenderer<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // a closed stdout leaves nothing to report to
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.line("Loading...");
        }
    }

    fn show_error(&mut self, message: &str) {
        self.line(&format!("! {message}"));
    }

    fn hide_error(&mut self) {}

    fn hide_results(&mut self) {}

    fn show_report(&mut self, report: &AirQualityReport) {
        let card = format_report(report);
        self.line(&card);
    }

    fn show_suggestions(&mut self, suggestions: &[LocationCandidate]) {
        let mut text = String::from("Suggestions:");
        for (i, candidate) in suggestions.iter().enumerate() {
            text.push_str(&format!("\n  {}. {}", i + 1, candidate.display_name));
        }
        self.line(&text);
    }

    fn hide_suggestions(&mut self) {}

    fn set_query_text(&mut self, text: &str) {
        self.line(&format!("> {text}"));
    }
}
