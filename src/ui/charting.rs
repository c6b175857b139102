use crate::time_series::TimeSeriesPoint;

/// X (seconds) and Y (WPM) upper bounds for the results chart. Both are at
/// least 1 so the axes never collapse.
pub fn compute_chart_params(samples: &[TimeSeriesPoint]) -> (f64, f64) {
    let highest_wpm = samples.iter().map(|p| p.wpm).fold(0.0, f64::max);
    let duration = samples.last().map(|p| p.t).unwrap_or(1.0);

    (duration.max(1.0), highest_wpm.round().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_samples_give_unit_bounds() {
        assert_eq!(compute_chart_params(&[]), (1.0, 1.0));
    }

    #[test]
    fn bounds_follow_last_time_and_peak() {
        let samples = [
            TimeSeriesPoint::new(1.0, 30.0),
            TimeSeriesPoint::new(2.0, 52.4),
            TimeSeriesPoint::new(2.6, 48.0),
        ];
        assert_eq!(compute_chart_params(&samples), (2.6, 52.0));
    }

    #[test]
    fn labels() {
        assert_eq!(format_label(3.0), "3");
        assert_eq!(format_label(2.64), "2.6");
    }
}
