//! Shared "fetch pipeline" used by both the CLI and TUI front-ends.
//!
//! selection -> series id -> chunked fetch -> summary statistics
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;
use tracing::info;

use crate::catalog::{Indicator, Resolved};
use crate::data::{ChunkSource, fetch_series};
use crate::domain::SeriesTable;
use crate::error::AppError;
use crate::report::Summary;

/// Default first date of the range.
pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// What to fetch: a resolved indicator selection and a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub selection: Resolved,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Query {
    pub fn new(
        indicator: Indicator,
        category: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, AppError> {
        Ok(Self {
            selection: indicator.resolve(category)?,
            start,
            end,
        })
    }
}

/// All computed outputs of one fetch.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub selection: Resolved,
    pub table: SeriesTable,
    pub summary: Summary,
}

/// Fetch the query's series and compute its summary statistics.
pub fn run_query<S>(source: &S, query: &Query) -> Result<RunOutput, AppError>
where
    S: ChunkSource + ?Sized,
{
    let table = fetch_series(source, query.selection.series, query.start, query.end)?;
    let summary = Summary::from_table(&table);
    info!(
        indicator = query.selection.indicator.display_name(),
        series = %query.selection.series,
        rows = table.len(),
        failed_windows = table.chunks.failed,
        "fetched"
    );

    Ok(RunOutput {
        selection: query.selection,
        table,
        summary,
    })
}
