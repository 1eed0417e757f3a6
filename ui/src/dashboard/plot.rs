//! Maps a [`Figure`] onto the SVG viewport: scales, ticks and path strings.

use api::chart::{Figure, Trace};
use api::dataset::date_timestamp;
use api::smoothing::to_datetime;
use time::{Date, Month};

use crate::core::format::{format_tick, format_year};

pub const VIEW_WIDTH: f64 = 760.0;
pub const VIEW_HEIGHT: f64 = 440.0;

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 56.0;

const MAX_X_TICKS: i32 = 8;
const TARGET_Y_TICKS: f64 = 5.0;
const MAX_Y_TICKS: usize = 12;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Data extent of every valued point, padded so nothing sits on the
    /// frame. `None` when the figure has nothing to plot.
    pub fn of(figure: &Figure) -> Option<Self> {
        let mut points = figure
            .traces
            .iter()
            .flat_map(|trace| trace.points.iter())
            .filter_map(|point| Some((point.x, point.y?)))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let (x0, y0) = points.next()?;
        let mut bounds = Self {
            x_min: x0,
            x_max: x0,
            y_min: y0,
            y_max: y0,
        };
        for (x, y) in points {
            bounds.x_min = bounds.x_min.min(x);
            bounds.x_max = bounds.x_max.max(x);
            bounds.y_min = bounds.y_min.min(y);
            bounds.y_max = bounds.y_max.max(y);
        }

        // A single release still needs a visible span.
        if bounds.x_max - bounds.x_min < SECONDS_PER_DAY {
            bounds.x_min -= 180.0 * SECONDS_PER_DAY;
            bounds.x_max += 180.0 * SECONDS_PER_DAY;
        }
        // A span lost in rounding is treated as flat.
        let y_span = bounds.y_max - bounds.y_min;
        let magnitude = bounds.y_max.abs().max(bounds.y_min.abs());
        let y_pad = if y_span > 0.0 && y_span > magnitude * 1e-9 {
            y_span * 0.08
        } else {
            bounds.y_max.abs().max(1.0) * 0.1
        };
        bounds.y_min -= y_pad;
        bounds.y_max += y_pad;
        Some(bounds)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Vertical strip of the plot area that hovers the data x `target`. Strips
/// meet halfway between neighbouring positions, so the pointer always
/// selects the nearest x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverBand {
    pub x: f64,
    pub width: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub bounds: Bounds,
}

impl Projection {
    pub fn new(figure: &Figure) -> Option<Self> {
        Bounds::of(figure).map(|bounds| Self { bounds })
    }

    pub fn left(&self) -> f64 {
        MARGIN_LEFT
    }

    pub fn right(&self) -> f64 {
        VIEW_WIDTH - MARGIN_RIGHT
    }

    pub fn top(&self) -> f64 {
        MARGIN_TOP
    }

    pub fn bottom(&self) -> f64 {
        VIEW_HEIGHT - MARGIN_BOTTOM
    }

    pub fn x(&self, value: f64) -> f64 {
        let Bounds { x_min, x_max, .. } = self.bounds;
        self.left() + (value - x_min) / (x_max - x_min) * (self.right() - self.left())
    }

    pub fn y(&self, value: f64) -> f64 {
        let Bounds { y_min, y_max, .. } = self.bounds;
        self.bottom() - (value - y_min) / (y_max - y_min) * (self.bottom() - self.top())
    }

    /// SVG path for a line trace. A missing value breaks the line.
    pub fn line_path(&self, trace: &Trace) -> String {
        let mut d = String::new();
        let mut pen_down = false;
        for point in &trace.points {
            match point.y {
                Some(y) if y.is_finite() => {
                    let cmd = if pen_down { 'L' } else { 'M' };
                    if !d.is_empty() {
                        d.push(' ');
                    }
                    d.push_str(&format!("{cmd}{:.2},{:.2}", self.x(point.x), self.y(y)));
                    pen_down = true;
                }
                _ => pen_down = false,
            }
        }
        d
    }

    /// January 1st ticks, thinned to at most a handful of labels.
    pub fn x_ticks(&self) -> Vec<Tick> {
        let Bounds { x_min, x_max, .. } = self.bounds;
        let (Some(start), Some(end)) = (to_datetime(x_min), to_datetime(x_max)) else {
            return Vec::new();
        };
        let first_year = start.year();
        let last_year = end.year();
        if last_year < first_year {
            return Vec::new();
        }
        let span = last_year - first_year + 1;
        let step = [1, 2, 5, 10, 20, 25, 50]
            .into_iter()
            .find(|step| span / step < MAX_X_TICKS)
            .unwrap_or(100);
        let aligned = first_year + (step - first_year.rem_euclid(step)) % step;

        (aligned..=last_year)
            .step_by(step as usize)
            .filter_map(|year| Date::from_calendar_date(year, Month::January, 1).ok())
            .map(date_timestamp)
            .filter(|x| (x_min..=x_max).contains(x))
            .map(|x| Tick {
                position: self.x(x),
                label: format_year(x),
            })
            .collect()
    }

    /// Evenly stepped y ticks on a 1/2/5 grid, at most `MAX_Y_TICKS`.
    pub fn y_ticks(&self) -> Vec<Tick> {
        let Bounds { y_min, y_max, .. } = self.bounds;
        let step = nice_step((y_max - y_min) / TARGET_Y_TICKS);
        if !(step.is_finite() && step > 0.0) {
            return Vec::new();
        }
        let first = (y_min / step).ceil() * step;
        let count = ((y_max - first) / step + 1e-9).floor();
        if !(count.is_finite() && count >= 0.0) {
            return Vec::new();
        }

        let mut ticks: Vec<Tick> = (0..=(count as usize).min(MAX_Y_TICKS - 1))
            .map(|i| {
                let value = first + step * i as f64;
                Tick {
                    position: self.y(value),
                    label: format_tick(value, step),
                }
            })
            .collect();
        ticks.dedup_by(|a, b| a.label == b.label);
        ticks
    }

    /// Hover strips across the plot area for ascending data x `positions`.
    pub fn hover_bands(&self, positions: &[f64]) -> Vec<HoverBand> {
        let centers: Vec<f64> = positions.iter().map(|&x| self.x(x)).collect();
        centers
            .iter()
            .zip(positions)
            .enumerate()
            .map(|(idx, (&center, &target))| {
                let start = match idx {
                    0 => self.left(),
                    _ => (centers[idx - 1] + center) / 2.0,
                };
                let end = match centers.get(idx + 1) {
                    Some(next) => (center + next) / 2.0,
                    None => self.right(),
                };
                HoverBand {
                    x: start,
                    width: (end - start).max(0.0),
                    target,
                }
            })
            .collect()
    }
}

fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return f64::NAN;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
