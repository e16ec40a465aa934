//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the fetcher and consumed by the report/plot/TUI layers
//! - exported to JSON/CSV

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric code the BCB SGS API uses to select a series (e.g. `433` for IPCA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(u32);

impl SeriesId {
    /// Series codes are positive; `0` is never a valid SGS code.
    pub const fn new(code: u32) -> Option<Self> {
        if code == 0 { None } else { Some(Self(code)) }
    }

    /// For static tables; a zero code fails const evaluation.
    pub(crate) const fn known(code: u32) -> Self {
        assert!(code != 0, "SGS series codes are positive");
        Self(code)
    }

    pub const fn code(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `(date, value)` data point. `value` is `None` when the source value
/// could not be read as a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Per-fetch chunk bookkeeping, useful for diagnostics and the TUI status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkTally {
    pub issued: usize,
    pub with_rows: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Ordered observations for one series over one requested date range.
///
/// Rows keep the order the chunks were issued in (and, within a chunk, the
/// order the API returned them). Nothing is re-sorted or de-duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    pub series: SeriesId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rows: Vec<Observation>,
    pub chunks: ChunkTally,
}

impl SeriesTable {
    /// The canonical empty table: `(date, value)` shape, zero rows.
    pub fn empty(series: SeriesId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            series,
            start,
            end,
            rows: Vec::new(),
            chunks: ChunkTally::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Non-missing values, in row order.
    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|o| o.value).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.rows.iter().filter(|o| o.value.is_none()).count()
    }
}

/// Inclusive `[start, end]` date window sent as one remote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Chunk {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_id_rejects_zero() {
        assert!(SeriesId::new(0).is_none());
        assert_eq!(SeriesId::new(433).map(SeriesId::code), Some(433));
    }

    #[test]
    fn values_skip_missing_rows() {
        let mut table = SeriesTable::empty(SeriesId::new(1).unwrap(), d(2020, 1, 1), d(2020, 1, 3));
        table.rows = vec![
            Observation::new(d(2020, 1, 1), Some(5.0)),
            Observation::new(d(2020, 1, 2), None),
            Observation::new(d(2020, 1, 3), Some(5.5)),
        ];
        assert_eq!(table.len(), 3);
        assert_eq!(table.values(), vec![5.0, 5.5]);
        assert_eq!(table.missing_count(), 1);
    }
}
