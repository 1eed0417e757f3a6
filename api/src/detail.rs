//! Detail panel model: what the side panel shows for the current hover.
//!
//! The panel has two states driven purely by hover events, `Placeholder`
//! (nothing hovered, the initial state) and `Hovered`. `Unavailable` renders
//! a load error in the same frame.

use serde::{Deserialize, Serialize};

use crate::chart::{Figure, HoverEvent};
use crate::dataset::MovieRecord;

pub const PLACEHOLDER_HEADING: &str = "Hover Over the Graph For More Information";
pub const PLACEHOLDER_TEXT: &str = "...";
pub const PLACEHOLDER_METRIC: &str = "-.--";
pub const PLACEHOLDER_POSTER: &str = "https://placehold.co/2000x3000?text=...";
pub const PLACEHOLDER_BACKDROP: &str = "https://placehold.co/410x280?text=...";
pub const UNAVAILABLE_HEADING: &str = "Couldn't load this franchise";
pub const COMMENT_COLOR: &str = "#306899";

const MISSING: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelState {
    Placeholder,
    Hovered,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Media {
    Image(String),
    /// Embedded trailer URL.
    Trailer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricIcon {
    Movie,
    Ticket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub icon: MetricIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPanel {
    pub state: PanelState,
    pub heading: String,
    /// "date · runtime · tagline" line under the heading.
    pub subtitle: String,
    pub poster: String,
    pub media: Media,
    pub performance: MetricCard,
    pub sentiment: MetricCard,
    /// Budget, box office, profit and ROI, in that order.
    pub stats: Vec<StatLine>,
    /// Rendered italic; empty when nothing is hovered.
    pub comment: String,
}

impl DetailPanel {
    pub fn placeholder() -> Self {
        Self {
            state: PanelState::Placeholder,
            heading: PLACEHOLDER_HEADING.to_string(),
            subtitle: PLACEHOLDER_TEXT.to_string(),
            poster: PLACEHOLDER_POSTER.to_string(),
            media: Media::Image(PLACEHOLDER_BACKDROP.to_string()),
            performance: metric_card("Performance", None, MetricIcon::Movie),
            sentiment: metric_card("Sentiment", None, MetricIcon::Ticket),
            stats: stat_lines(["", "", "", ""]),
            comment: String::new(),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        Self {
            state: PanelState::Unavailable,
            heading: UNAVAILABLE_HEADING.to_string(),
            subtitle: message.to_string(),
            ..Self::placeholder()
        }
    }

    pub fn hovered(record: &MovieRecord) -> Self {
        let date = record
            .formatted_release_date
            .clone()
            .unwrap_or_else(|| MISSING.to_string());
        let runtime = record
            .runtime
            .map(|minutes| minutes.to_string())
            .unwrap_or_else(|| MISSING.to_string());

        Self {
            state: PanelState::Hovered,
            heading: record.title.clone(),
            subtitle: format!("{date} · {runtime} min · {}", record.tagline),
            poster: record.poster_url.clone(),
            media: Media::Trailer(record.trailer.clone()),
            performance: metric_card("Performance", record.performance, MetricIcon::Movie),
            sentiment: metric_card("Sentiment", record.sentiment_score, MetricIcon::Ticket),
            stats: stat_lines([
                format_currency(record.production_budget).as_str(),
                format_currency(record.box_office).as_str(),
                format_currency(record.profit).as_str(),
                format_percent(record.roi_percentage).as_str(),
            ]),
            comment: record.comment.clone(),
        }
    }
}

/// Panel for `hover` over `figure`. A missing hover, or one that doesn't
/// resolve to a marker payload, gives the placeholder.
pub fn render_detail(figure: &Figure, hover: Option<HoverEvent>) -> DetailPanel {
    hover
        .and_then(|event| figure.payload(event))
        .map(DetailPanel::hovered)
        .unwrap_or_else(DetailPanel::placeholder)
}

fn metric_card(label: &str, value: Option<f64>, icon: MetricIcon) -> MetricCard {
    MetricCard {
        label: label.to_string(),
        value: format_metric(value),
        icon,
    }
}

fn stat_lines(values: [&str; 4]) -> Vec<StatLine> {
    ["Production Budget", "Box Office", "Profit", "ROI Percentage"]
        .into_iter()
        .zip(values)
        .map(|(label, value)| StatLine {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect()
}

/// The stored score as written in the dataset (shortest round-trip form),
/// or the placeholder when missing.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:?}"),
        None => PLACEHOLDER_METRIC.to_string(),
    }
}

/// Whole dollars with thousands separators: `$1,234,567`, `-$20,000`.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}%"),
        None => MISSING.to_string(),
    }
}
