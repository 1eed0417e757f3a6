//! Formatting helpers for chart axes and labels.

use api::smoothing::to_datetime;

/// Axis label for a y value, trimmed to the precision the tick step needs.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    let out = format!("{value:.decimals$}");
    // Avoid "-0" / "-0.0" labels.
    if out.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        out.trim_start_matches('-').to_string()
    } else {
        out
    }
}

/// Calendar year of an epoch-seconds x value.
pub fn format_year(x: f64) -> String {
    to_datetime(x)
        .map(|stamp| stamp.year().to_string())
        .unwrap_or_default()
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_precision_follows_step() {
        assert_eq!(format_tick(0.2, 0.2), "0.2");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(40.0, 20.0), "40");
        assert_eq!(format_tick(-0.0001, 0.2), "0.0");
    }

    #[test]
    fn year_of_timestamp() {
        assert_eq!(format_year(1_527_206_400.0), "2018");
        assert_eq!(format_year(f64::NAN), "");
    }
}
