//! Descriptive statistics over a fetched series.

use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};

use crate::domain::SeriesTable;

/// Mean / median / sample standard deviation of the non-missing values.
///
/// Each statistic is `None` when it is undefined for the data at hand
/// (no values at all, or a single value for the standard deviation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

impl Summary {
    pub fn from_table(table: &SeriesTable) -> Self {
        let values = table.values();
        let mut summary = Self::from_values(&values);
        summary.rows = table.len();
        summary.missing = table.missing_count();
        summary
    }

    pub fn from_values(values: &[f64]) -> Self {
        let (mean, median, std_dev) = if values.is_empty() {
            (None, None, None)
        } else {
            let median = Data::new(values.to_vec()).median();
            (
                finite(values.iter().mean()),
                finite(median),
                finite(values.iter().std_dev()),
            )
        };

        Self {
            rows: values.len(),
            missing: 0,
            mean,
            median,
            std_dev,
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Observation, SeriesId};

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn known_values() {
        let s = Summary::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(close(s.mean, 5.0));
        assert!(close(s.median, 4.5));
        // Sample (n - 1) standard deviation: sqrt(32 / 7).
        assert!(close(s.std_dev, (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn odd_count_median() {
        let s = Summary::from_values(&[3.0, 1.0, 2.0]);
        assert!(close(s.median, 2.0));
    }

    #[test]
    fn empty_and_single_value() {
        let s = Summary::from_values(&[]);
        assert_eq!((s.mean, s.median, s.std_dev), (None, None, None));

        let s = Summary::from_values(&[4.5]);
        assert!(close(s.mean, 4.5));
        assert!(close(s.median, 4.5));
        assert_eq!(s.std_dev, None);
    }

    #[test]
    fn missing_values_are_skipped() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let mut table = SeriesTable::empty(SeriesId::new(4189).unwrap(), day(1), day(4));
        table.rows = vec![
            Observation::new(day(1), Some(10.0)),
            Observation::new(day(2), None),
            Observation::new(day(3), Some(12.0)),
        ];

        let s = Summary::from_table(&table);
        assert_eq!(s.rows, 3);
        assert_eq!(s.missing, 1);
        assert!(close(s.mean, 11.0));
        assert!(close(s.median, 11.0));
    }
}
