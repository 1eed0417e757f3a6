//! Figure model for the performance / sentiment chart.
//!
//! A figure is four overlaid traces: a smoothed line and the raw markers for
//! each metric. Markers carry the full [`MovieRecord`] of their row as hover
//! payload, so the detail panel reads named fields instead of indexing into a
//! tuple.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, MovieRecord};
use crate::smoothing::{smooth_line, SmoothedCurve};

pub const PERFORMANCE: &str = "Performance";
pub const SENTIMENT: &str = "Sentiment";
pub const PERFORMANCE_COLOR: &str = "#e63946";
pub const SENTIMENT_COLOR: &str = "#457b9d";

pub const LINE_WIDTH: f64 = 2.0;
pub const MARKER_SIZE: f64 = 4.0;

pub const FIGURE_TITLE: &str = "Performance and Sentiment Over Time";
pub const X_AXIS_TITLE: &str = "Release Date";
pub const Y_AXIS_TITLE: &str = "Performance/Sentiment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// Seconds since the Unix epoch.
    pub x: f64,
    /// `None` leaves a gap.
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<MovieRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub mode: TraceMode,
    pub color: String,
    /// Line width for lines, marker size for markers.
    pub size: f64,
    pub hoverable: bool,
    pub show_legend: bool,
    /// Legend toggles hide or show every trace sharing this group.
    pub legend_group: String,
    pub visible: bool,
    pub points: Vec<TracePoint>,
}

impl Trace {
    fn smoothed(name: &str, color: &str, curve: &SmoothedCurve) -> Self {
        Self {
            name: name.to_string(),
            mode: TraceMode::Lines,
            color: color.to_string(),
            size: LINE_WIDTH,
            hoverable: false,
            show_legend: false,
            legend_group: name.to_string(),
            visible: true,
            points: curve
                .points()
                .map(|(x, y)| TracePoint {
                    x,
                    y: Some(y),
                    payload: None,
                })
                .collect(),
        }
    }

    fn markers<F>(name: &str, color: &str, dataset: &Dataset, value: F) -> Self
    where
        F: Fn(&MovieRecord) -> Option<f64>,
    {
        Self {
            name: name.to_string(),
            mode: TraceMode::Markers,
            color: color.to_string(),
            size: MARKER_SIZE,
            hoverable: true,
            show_legend: true,
            legend_group: name.to_string(),
            visible: true,
            points: dataset
                .dated()
                .filter_map(|record| {
                    Some(TracePoint {
                        x: record.timestamp()?,
                        y: value(record),
                        payload: Some(record.clone()),
                    })
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Visible and accepting hover.
    fn interactive(&self) -> bool {
        self.visible && self.hoverable
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: FIGURE_TITLE.to_string(),
            x_axis_title: X_AXIS_TITLE.to_string(),
            y_axis_title: Y_AXIS_TITLE.to_string(),
        }
    }
}

/// A hovered marker: trace index and point index within that trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverEvent {
    pub trace: usize,
    pub point: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Same layout, no data. Used when a dataset can't be loaded.
    pub fn empty() -> Self {
        Self {
            traces: Vec::new(),
            layout: Layout::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(Trace::is_empty)
    }

    /// Same figure with every trace in `hidden` legend groups turned off.
    /// Trace and point indices are unchanged, so hover events stay valid
    /// against the original figure.
    pub fn with_hidden_groups(&self, hidden: &[String]) -> Self {
        let mut figure = self.clone();
        for trace in &mut figure.traces {
            trace.visible = !hidden.contains(&trace.legend_group);
        }
        figure
    }

    /// Primary hover target at `x`: the first visible hoverable trace, in
    /// trace order, with a valued point at exactly that x. Hover is always
    /// unified on x.
    pub fn hover_at(&self, x: f64) -> Option<HoverEvent> {
        self.traces
            .iter()
            .enumerate()
            .filter(|(_, trace)| trace.interactive())
            .find_map(|(trace_idx, trace)| {
                trace
                    .points
                    .iter()
                    .position(|point| point.x == x && point.y.is_some())
                    .map(|point| HoverEvent {
                        trace: trace_idx,
                        point,
                    })
            })
    }

    /// Every hoverable point sharing the event's x, for a unified tooltip.
    pub fn unified_points(&self, event: HoverEvent) -> Vec<(&Trace, &TracePoint)> {
        let Some(anchor) = self.point(event) else {
            return Vec::new();
        };
        self.traces
            .iter()
            .filter(|trace| trace.interactive())
            .flat_map(|trace| {
                trace
                    .points
                    .iter()
                    .filter(|point| point.x == anchor.x && point.y.is_some())
                    .map(move |point| (trace, point))
            })
            .collect()
    }

    pub fn point(&self, event: HoverEvent) -> Option<&TracePoint> {
        self.traces.get(event.trace)?.points.get(event.point)
    }

    pub fn payload(&self, event: HoverEvent) -> Option<&MovieRecord> {
        self.point(event)?.payload.as_ref()
    }

    /// Distinct x positions that resolve to a hover target, ascending.
    pub fn hover_positions(&self) -> Vec<f64> {
        let mut xs: Vec<f64> = self
            .traces
            .iter()
            .filter(|trace| trace.interactive())
            .flat_map(|trace| trace.points.iter())
            .filter(|point| point.y.is_some())
            .map(|point| point.x)
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        xs
    }
}

/// Build the four-trace figure for a loaded dataset. Rows without a release
/// date are not plotted.
pub fn build_figure(dataset: &Dataset, points: usize) -> Figure {
    let dated: Vec<&MovieRecord> = dataset.dated().collect();
    let x: Vec<f64> = dated.iter().filter_map(|r| r.timestamp()).collect();
    let performance: Vec<Option<f64>> = dated.iter().map(|r| r.performance).collect();
    let sentiment: Vec<Option<f64>> = dated.iter().map(|r| r.sentiment_score).collect();

    let smooth_performance = smooth_line(&x, &performance, points);
    let smooth_sentiment = smooth_line(&x, &sentiment, points);

    Figure {
        traces: vec![
            Trace::smoothed(PERFORMANCE, PERFORMANCE_COLOR, &smooth_performance),
            Trace::markers(PERFORMANCE, PERFORMANCE_COLOR, dataset, |r| r.performance),
            Trace::smoothed(SENTIMENT, SENTIMENT_COLOR, &smooth_sentiment),
            Trace::markers(SENTIMENT, SENTIMENT_COLOR, dataset, |r| r.sentiment_score),
        ],
        layout: Layout::default(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dataset::parse_dataset;
    use crate::smoothing::DEFAULT_SMOOTHING_POINTS;

    pub(crate) const FIVE_ROWS: &str = "\
title,release_date,production_budget,box_office,profit,roi_percentage,performance,poster_url,backdrop_url,runtime,tagline,trailer,sentiment_score,comment
Episode IV,\"May 25, 1977\",11000000,775398007,764398007,6949.07,0.92,p4,b4,121,A long time ago,t4,0.81,Classic
Episode V,\"May 21, 1980\",18000000,538375067,520375067,2890.97,0.88,p5,b5,124,The saga continues,t5,0.86,Darker
Episode VI,\"May 25, 1983\",32500000,475106177,442606177,1361.87,0.79,p6,b6,131,The Jedi returns,t6,0.74,Ewoks
Episode I,\"May 19, 1999\",115000000,1027044677,912044677,793.08,0.71,p1,b1,136,Every saga has a beginning,t1,0.52,Podracing
Episode II,\"May 16, 2002\",115000000,653779970,538779970,468.50,0.55,p2,b2,142,A Jedi shall not know anger,t2,0.47,Sand";

    fn five_rows() -> Dataset {
        parse_dataset(FIVE_ROWS.as_bytes()).unwrap()
    }

    #[test]
    fn five_rows_build_four_traces() {
        let figure = build_figure(&five_rows(), DEFAULT_SMOOTHING_POINTS);
        assert_eq!(figure.traces.len(), 4);
        assert_eq!(figure.traces[0].len(), 300);
        assert_eq!(figure.traces[1].len(), 5);
        assert_eq!(figure.traces[2].len(), 300);
        assert_eq!(figure.traces[3].len(), 5);

        let modes: Vec<_> = figure.traces.iter().map(|t| t.mode).collect();
        assert_eq!(
            modes,
            [TraceMode::Lines, TraceMode::Markers, TraceMode::Lines, TraceMode::Markers]
        );
        assert!(figure.traces.iter().all(|t| t.hoverable == (t.mode == TraceMode::Markers)));
        assert!(!figure.traces[0].show_legend && !figure.traces[2].show_legend);
        assert_eq!(figure.traces[0].legend_group, figure.traces[1].legend_group);
        assert_eq!(figure.traces[3].color, SENTIMENT_COLOR);
        assert!(figure.traces.iter().all(|t| t.visible));
    }

    #[test]
    fn smoothed_trace_spans_marker_range() {
        let figure = build_figure(&five_rows(), 300);
        let line = &figure.traces[0].points;
        let markers = &figure.traces[1].points;
        assert_eq!(line[0].x, markers[0].x);
        assert_eq!(line[line.len() - 1].x, markers[markers.len() - 1].x);
    }

    #[test]
    fn markers_carry_their_row() {
        let dataset = five_rows();
        let figure = build_figure(&dataset, 300);
        for (point, record) in figure.traces[3].points.iter().zip(dataset.records.iter()) {
            assert_eq!(point.payload.as_ref(), Some(record));
            assert_eq!(point.y, record.sentiment_score);
        }
        assert!(figure.traces[0].points.iter().all(|p| p.payload.is_none()));
    }

    #[test]
    fn null_sentiment_leaves_single_raw_point() {
        let csv = "\
title,release_date,production_budget,box_office,profit,roi_percentage,performance,poster_url,backdrop_url,runtime,tagline,trailer,sentiment_score,comment
One,\"Jan 01, 2000\",1,2,1,100,0.5,p,b,90,t,tr,0.6,c
Two,\"Jan 01, 2005\",1,2,1,100,0.7,p,b,95,t,tr,,c";
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        let figure = build_figure(&dataset, 300);

        let smoothed_sentiment = &figure.traces[2].points;
        assert_eq!(smoothed_sentiment.len(), 1);
        assert_eq!(smoothed_sentiment[0].y, Some(0.6));
        assert_eq!(Some(smoothed_sentiment[0].x), dataset.records[0].timestamp());

        // Performance has two valid points: returned unsmoothed too.
        assert_eq!(figure.traces[0].len(), 2);
        // The marker with a null value is kept as a gap.
        assert_eq!(figure.traces[3].len(), 2);
        assert_eq!(figure.traces[3].points[1].y, None);
    }

    #[test]
    fn undated_rows_are_not_plotted() {
        let csv = "\
title,release_date,production_budget,box_office,profit,roi_percentage,performance,poster_url,backdrop_url,runtime,tagline,trailer,sentiment_score,comment
One,\"Jan 01, 2000\",1,2,1,100,0.5,p,b,90,t,tr,0.6,c
Lost,TBD,1,2,1,100,0.9,p,b,95,t,tr,0.9,c";
        let figure = build_figure(&parse_dataset(csv.as_bytes()).unwrap(), 300);
        assert_eq!(figure.traces[1].len(), 1);
        assert_eq!(figure.traces[1].points[0].payload.as_ref().unwrap().title, "One");
    }

    #[test]
    fn unified_hover_prefers_first_hoverable_trace() {
        let figure = build_figure(&five_rows(), 300);
        let x = figure.traces[1].points[2].x;
        let event = figure.hover_at(x).unwrap();
        assert_eq!(event, HoverEvent { trace: 1, point: 2 });
        assert_eq!(figure.payload(event).unwrap().title, "Episode VI");

        let unified = figure.unified_points(event);
        assert_eq!(unified.len(), 2);
        assert_eq!(unified[1].0.name, SENTIMENT);

        assert!(figure.hover_at(x + 1.0).is_none());
        assert_eq!(figure.hover_positions().len(), 5);
    }

    #[test]
    fn hidden_legend_group_leaves_hover_to_the_other_metric() {
        let figure = build_figure(&five_rows(), 300);
        let x = figure.traces[1].points[2].x;
        let hidden = figure.with_hidden_groups(&[PERFORMANCE.to_string()]);

        assert!(!hidden.traces[0].visible && !hidden.traces[1].visible);
        assert!(hidden.traces[2].visible && hidden.traces[3].visible);
        let event = hidden.hover_at(x).unwrap();
        assert_eq!(event, HoverEvent { trace: 3, point: 2 });
        // Indices still resolve against the unfiltered figure.
        assert_eq!(figure.payload(event).unwrap().title, "Episode VI");
        assert_eq!(hidden.unified_points(event).len(), 1);

        let everything = figure.with_hidden_groups(&[PERFORMANCE.to_string(), SENTIMENT.to_string()]);
        assert!(everything.hover_at(x).is_none());
        assert!(everything.hover_positions().is_empty());
    }

    #[test]
    fn empty_figure_keeps_layout() {
        let figure = Figure::empty();
        assert!(figure.is_empty());
        assert_eq!(figure.layout.title, FIGURE_TITLE);
        assert!(figure.hover_at(0.0).is_none());
    }

    #[test]
    fn figure_survives_the_wire() {
        let figure = build_figure(&five_rows(), 20);
        let json = serde_json::to_string(&figure).unwrap();
        let back: Figure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, figure);
    }
}
