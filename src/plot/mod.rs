//! Chart data preparation shared by the ASCII plot and the TUI chart.

use chrono::{Datelike, NaiveDate};

use crate::domain::SeriesTable;

pub mod ascii;

pub use ascii::render_ascii_plot;

/// Dates are plotted as days since 0001-01-01 (CE).
pub fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Inverse of `day_number`, for axis labels.
pub fn date_from_day_number(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Split the table into runs of consecutive non-missing points.
///
/// Missing values end the current run, so charts show a gap rather than
/// interpolating across it.
pub fn line_segments(table: &SeriesTable) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for row in &table.rows {
        match row.value {
            Some(v) => current.push((day_number(row.date), v)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// X/Y bounds of the plotted points, or `None` when there is nothing to draw.
///
/// A single day is widened by one day on each side; the y range gets 5%
/// padding so flat series stay visible.
pub fn chart_bounds(segments: &[Vec<(f64, f64)>]) -> Option<([f64; 2], [f64; 2])> {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in segments.iter().flatten() {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    if x_max <= x_min {
        x_min -= 1.0;
        x_max += 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-6);
    Some(([x_min, x_max], [y_min - pad, y_max + pad]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, SeriesId};

    #[test]
    fn day_numbers_round_trip() {
        let date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        assert_eq!(date_from_day_number(day_number(date)), Some(date));
        assert_eq!(date_from_day_number(f64::NAN), None);
    }

    #[test]
    fn gaps_split_segments() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let mut table = SeriesTable::empty(SeriesId::new(1).unwrap(), d(1), d(6));
        table.rows = vec![
            Observation::new(d(1), None),
            Observation::new(d(2), Some(1.0)),
            Observation::new(d(3), Some(2.0)),
            Observation::new(d(4), None),
            Observation::new(d(5), None),
            Observation::new(d(6), Some(3.0)),
        ];

        let segments = line_segments(&table);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1], vec![(day_number(d(6)), 3.0)]);
    }

    #[test]
    fn bounds_pad_y_and_widen_single_day() {
        let segments = vec![vec![(10.0, 2.0)]];
        let ([x0, x1], [y0, y1]) = chart_bounds(&segments).unwrap();
        assert!(x0 < 10.0 && x1 > 10.0);
        assert!(y0 < 2.0 && y1 > 2.0);
        assert!(chart_bounds(&[]).is_none());
    }
}
