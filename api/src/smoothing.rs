//! Display smoothing: an interpolating spline resampled on an even grid.
//!
//! With four or more samples the curve is a cubic spline with not-a-knot end
//! conditions. Exactly three samples give the interpolating parabola (the
//! not-a-knot cubic degenerates to it). Fewer than three samples, or x values
//! that are not strictly increasing, return the filtered samples unchanged.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

pub const DEFAULT_SMOOTHING_POINTS: usize = 300;

/// Samples required before a curve is fitted.
pub const MIN_SPLINE_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Smoothing {
    /// Resampled from a fitted spline.
    Spline,
    /// Filtered input returned as-is.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub smoothing: Smoothing,
}

impl SmoothedCurve {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Smooth `y` over `x` (epoch seconds), resampling to `points` samples.
/// Pairs with a missing or non-finite value are dropped first.
pub fn smooth_line(x: &[f64], y: &[Option<f64>], points: usize) -> SmoothedCurve {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(&x, &y)| match y {
            Some(y) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        })
        .unzip();

    if xs.len() < MIN_SPLINE_POINTS {
        return raw(xs, ys);
    }

    if xs.windows(2).any(|pair| pair[1] <= pair[0]) {
        debug!(
            "x is not strictly increasing across {} samples; skipping smoothing",
            xs.len()
        );
        return raw(xs, ys);
    }

    let Some(spline) = CubicSpline::fit(&xs, &ys) else {
        debug!("Spline fit has no finite solution; skipping smoothing");
        return raw(xs, ys);
    };

    let grid = linspace(xs[0], xs[xs.len() - 1], points);
    let values = grid.iter().map(|&at| spline.eval(at)).collect();
    SmoothedCurve {
        x: grid,
        y: values,
        smoothing: Smoothing::Spline,
    }
}

fn raw(x: Vec<f64>, y: Vec<f64>) -> SmoothedCurve {
    SmoothedCurve {
        x,
        y,
        smoothing: Smoothing::Raw,
    }
}

/// `count` evenly spaced values over `[start, end]`, endpoints exact.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            out[count - 1] = end;
            out
        }
    }
}

/// Curve x (epoch seconds) back to a timestamp for axis labels.
pub fn to_datetime(x: f64) -> Option<OffsetDateTime> {
    if !x.is_finite() {
        return None;
    }
    let nanos = (x * 1e9).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}

/// Piecewise cubic in second-derivative form.
struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// `x` must be strictly increasing with at least three entries.
    fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        let n = x.len();
        let m = if n == 3 {
            // Single parabola: constant second derivative.
            let d0 = (y[1] - y[0]) / (x[1] - x[0]);
            let d1 = (y[2] - y[1]) / (x[2] - x[1]);
            let curvature = 2.0 * (d1 - d0) / (x[2] - x[0]);
            vec![curvature; 3]
        } else {
            not_a_knot_second_derivatives(x, y)?
        };
        Some(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    fn eval(&self, at: f64) -> f64 {
        let last = self.x.len() - 1;
        // Segment containing `at`, clamped to the outer segments.
        let i = match self.x.partition_point(|&knot| knot <= at) {
            0 => 0,
            p => (p - 1).min(last - 1),
        };
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let a = x1 - at;
        let b = at - x0;
        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

/// Knot second derivatives for a not-a-knot cubic spline (n >= 4).
///
/// Continuity of the third derivative at the second and second-to-last knots
/// expresses the end moments through their neighbours. Folding those into the
/// first and last interior equations leaves a strictly diagonally dominant
/// tridiagonal system over the interior moments, solved without pivoting.
fn not_a_knot_second_derivatives(x: &[f64], y: &[f64]) -> Option<Vec<f64>> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // Unknowns are m[1..n-1]; row j is the equation at knot j + 1.
    let k = n - 2;
    let mut lower = Vec::with_capacity(k);
    let mut diag = Vec::with_capacity(k);
    let mut upper = Vec::with_capacity(k);
    let mut rhs = Vec::with_capacity(k);
    for i in 1..n - 1 {
        lower.push(h[i - 1]);
        diag.push(2.0 * (h[i - 1] + h[i]));
        upper.push(h[i]);
        rhs.push(6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]));
    }

    // m0 = ((h0 + h1) m1 - h0 m2) / h1
    let (h0, h1) = (h[0], h[1]);
    diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
    upper[0] = (h1 * h1 - h0 * h0) / h1;

    // m[n-1] = ((a + b) m[n-2] - b m[n-3]) / a
    let (a, b) = (h[n - 3], h[n - 2]);
    lower[k - 1] = (a * a - b * b) / a;
    diag[k - 1] = (a + b) * (2.0 * a + b) / a;

    let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;

    let mut m = Vec::with_capacity(n);
    m.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
    m.extend_from_slice(&interior);
    m.push(((a + b) * interior[k - 1] - b * interior[k - 2]) / a);
    m.iter().all(|v| v.is_finite()).then_some(m)
}

/// Thomas algorithm. `lower[0]` and `upper[len - 1]` are ignored. `None` on a
/// zero pivot or a non-finite result.
fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Option<Vec<f64>> {
    let n = diag.len();
    if n == 0 {
        return Some(Vec::new());
    }
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    for i in 0..n {
        let (sub, prev_c, prev_d) = if i == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (lower[i], c[i - 1], d[i - 1])
        };
        let pivot = diag[i] - sub * prev_c;
        if pivot == 0.0 || !pivot.is_finite() {
            return None;
        }
        c[i] = if i + 1 < n { upper[i] / pivot } else { 0.0 };
        d[i] = (rhs[i] - sub * prev_d) / pivot;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d[i] - c[i] * out[i + 1];
    }
    out.iter().all(|v| v.is_finite()).then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: f64 = 86_400.0;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn fewer_than_three_valid_points_are_returned_unchanged() {
        let x = [0.0, DAY, 2.0 * DAY];
        let y = [Some(1.0), None, Some(3.0)];
        let curve = smooth_line(&x, &y, 300);
        assert_eq!(curve.smoothing, Smoothing::Raw);
        assert_eq!(curve.x, vec![0.0, 2.0 * DAY]);
        assert_eq!(curve.y, vec![1.0, 3.0]);

        let single = smooth_line(&[5.0], &[Some(0.5)], 300);
        assert_eq!(single.x, vec![5.0]);
        assert_eq!(single.y, vec![0.5]);

        assert!(smooth_line(&[], &[], 300).is_empty());
    }

    #[test]
    fn output_spans_the_input_range_with_requested_count() {
        let x = [100.0, 250.0, 400.0, 900.0, 1000.0];
        let y = [Some(0.2), Some(0.9), None, Some(0.4), Some(0.6)];
        for points in [2, 7, 300] {
            let curve = smooth_line(&x, &y, points);
            assert_eq!(curve.smoothing, Smoothing::Spline);
            assert_eq!(curve.len(), points);
            assert_eq!(curve.x[0], 100.0);
            assert_eq!(curve.x[points - 1], 1000.0);
            assert!(curve.x.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn spline_passes_through_knots() {
        let x = [0.0, 1.0, 3.0, 4.0, 7.0, 8.0];
        let y = [1.0, 2.0, 0.0, 5.0, 3.0, 3.5];
        let opt: Vec<_> = y.iter().copied().map(Some).collect();
        let spline = CubicSpline::fit(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!(close(spline.eval(*xi), *yi), "knot {xi}");
        }
        let curve = smooth_line(&x, &opt, 9);
        // Grid step is 1.0, so every knot is a grid sample.
        for (xi, yi) in x.iter().zip(y.iter()) {
            let idx = *xi as usize;
            assert!(close(curve.x[idx], *xi));
            assert!(close(curve.y[idx], *yi));
        }
    }

    #[test]
    fn not_a_knot_reproduces_cubics() {
        let f = |t: f64| 0.5 * t.powi(3) - 2.0 * t * t + t + 4.0;
        let x = [-2.0, -0.5, 1.0, 1.5, 3.0];
        let y: Vec<_> = x.iter().map(|&t| Some(f(t))).collect();
        let curve = smooth_line(&x, &y, 41);
        for (t, v) in curve.points() {
            assert!(close(v, f(t)), "at {t}: {v} vs {}", f(t));
        }
    }

    #[test]
    fn evenly_spaced_knots_reproduce_cubics() {
        // Equal spacing zeroes the folded off-diagonal terms.
        let f = |t: f64| -t.powi(3) + 4.0 * t - 1.0;
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y: Vec<_> = x.iter().map(|&t| Some(f(t))).collect();
        let curve = smooth_line(&x, &y, 25);
        assert_eq!(curve.smoothing, Smoothing::Spline);
        for (t, v) in curve.points() {
            assert!(close(v, f(t)), "at {t}: {v} vs {}", f(t));
        }
    }

    #[test]
    fn four_knots_are_a_single_cubic() {
        let f = |t: f64| 2.0 * t.powi(3) - t + 0.5;
        let x = [0.0, 0.3, 1.7, 2.0];
        let y: Vec<_> = x.iter().map(|&t| Some(f(t))).collect();
        let curve = smooth_line(&x, &y, 13);
        for (t, v) in curve.points() {
            assert!(close(v, f(t)));
        }
    }

    #[test]
    fn tridiagonal_solver_matches_known_solution() {
        // [2 1 0; 1 3 1; 0 1 2] x = [4, 10, 8] has x = [1, 2, 3].
        let out = solve_tridiagonal(&[0.0, 1.0, 1.0], &[2.0, 3.0, 2.0], &[1.0, 1.0, 0.0], &[4.0, 10.0, 8.0])
            .unwrap();
        for (got, want) in out.iter().zip([1.0, 2.0, 3.0]) {
            assert!(close(*got, want));
        }
        assert!(solve_tridiagonal(&[0.0], &[0.0], &[0.0], &[1.0]).is_none());
    }

    #[test]
    fn three_points_give_the_parabola() {
        let f = |t: f64| 3.0 * t * t - t + 2.0;
        let x = [0.0, 1.0, 4.0];
        let y: Vec<_> = x.iter().map(|&t| Some(f(t))).collect();
        let curve = smooth_line(&x, &y, 17);
        assert_eq!(curve.smoothing, Smoothing::Spline);
        for (t, v) in curve.points() {
            assert!(close(v, f(t)));
        }
    }

    #[test]
    fn duplicate_or_unordered_x_falls_back() {
        let y = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let dup = smooth_line(&[0.0, 1.0, 1.0, 2.0], &y, 300);
        assert_eq!(dup.smoothing, Smoothing::Raw);
        assert_eq!(dup.len(), 4);

        let unordered = smooth_line(&[0.0, 2.0, 1.0, 3.0], &y, 300);
        assert_eq!(unordered.smoothing, Smoothing::Raw);
        assert_eq!(unordered.x, vec![0.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn smoothing_is_deterministic() {
        let x = [0.0, 10.0, 25.0, 31.0];
        let y = [Some(0.1), Some(0.8), Some(0.3), Some(0.5)];
        assert_eq!(smooth_line(&x, &y, 50), smooth_line(&x, &y, 50));
    }

    #[test]
    fn linspace_edges() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn curve_x_converts_back_to_dates() {
        let stamp = to_datetime(1_527_206_400.0).unwrap();
        assert_eq!(stamp.date(), time::macros::date!(2018 - 05 - 25));
        assert!(to_datetime(f64::NAN).is_none());
    }
}
