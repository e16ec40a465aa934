//! BCB SGS API integration: chunked series fetch.
//!
//! The SGS endpoint refuses queries spanning more than ~10 years, so a long
//! range is split into consecutive windows and the windows are fetched one at
//! a time. A window that comes back with a non-success status (or an
//! unreadable body) simply contributes no rows; only transport failures abort
//! the fetch.

use chrono::{Duration, NaiveDate};
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::domain::{Chunk, Observation, SeriesId, SeriesTable};

/// Largest distance (in days) between a window's first and last date.
pub const MAX_WINDOW_DAYS: i64 = 3652;

const BCB_DATE_FORMAT: &str = "%d/%m/%Y";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never completed (connection refused, timeout, broken body).
    #[error("BCB request for series {series} ({start}..{end}) failed: {source}")]
    Transport {
        series: SeriesId,
        start: NaiveDate,
        end: NaiveDate,
        #[source]
        source: BoxError,
    },
}

/// Why a window contributed no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkFailure {
    /// The API answered with a non-success HTTP status.
    Status(u16),
    /// A success status, but the body was not a JSON array of rows.
    Malformed(String),
}

/// Result of fetching one window.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    Rows(Vec<Observation>),
    Empty,
    Failed(ChunkFailure),
}

/// Something that can fetch one date window of one series.
///
/// `BcbClient` is the HTTP implementation; tests script their own.
pub trait ChunkSource {
    fn fetch_chunk(&self, series: SeriesId, chunk: Chunk) -> Result<ChunkOutcome, FetchError>;
}

/// Split `[start, end]` into windows of at most `MAX_WINDOW_DAYS`.
///
/// Returns no windows when `start >= end`. Windows are contiguous (each
/// starts the day after the previous one ends) and the last one ends on `end`.
pub fn plan_chunks(start: NaiveDate, end: NaiveDate) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    if start >= end {
        return chunks;
    }

    let window = Duration::days(MAX_WINDOW_DAYS);
    let mut cursor = start;
    while cursor <= end {
        let chunk_end = cursor
            .checked_add_signed(window)
            .map_or(end, |d| d.min(end));
        chunks.push(Chunk {
            start: cursor,
            end: chunk_end,
        });
        match chunk_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    chunks
}

/// Fetch `series` over `[start, end]`, one window at a time, in order.
pub fn fetch_series<S>(
    source: &S,
    series: SeriesId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SeriesTable, FetchError>
where
    S: ChunkSource + ?Sized,
{
    let mut table = SeriesTable::empty(series, start, end);
    for chunk in plan_chunks(start, end) {
        debug!(%series, start = %chunk.start, end = %chunk.end, "fetching window");
        let outcome = source.fetch_chunk(series, chunk)?;
        absorb(&mut table, chunk, outcome);
    }
    debug!(
        %series,
        rows = table.rows.len(),
        issued = table.chunks.issued,
        failed = table.chunks.failed,
        "series fetched"
    );
    Ok(table)
}

fn absorb(table: &mut SeriesTable, chunk: Chunk, outcome: ChunkOutcome) {
    table.chunks.issued += 1;
    match outcome {
        ChunkOutcome::Rows(rows) if !rows.is_empty() => {
            table.chunks.with_rows += 1;
            table.rows.extend(rows);
        }
        ChunkOutcome::Rows(_) | ChunkOutcome::Empty => {
            table.chunks.empty += 1;
        }
        ChunkOutcome::Failed(failure) => {
            table.chunks.failed += 1;
            debug!(
                series = %table.series,
                start = %chunk.start,
                end = %chunk.end,
                ?failure,
                "window skipped"
            );
        }
    }
}

/// Blocking HTTP client for the SGS API.
pub struct BcbClient {
    client: Client,
    base_url: String,
}

impl BcbClient {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_client(client, &settings.base_url))
    }

    /// Use a pre-built HTTP client (custom proxy/TLS/timeout setup).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the full history of `series` over `[start, end]`.
    pub fn fetch(&self, series: SeriesId, start: NaiveDate, end: NaiveDate) -> Result<SeriesTable, FetchError> {
        fetch_series(self, series, start, end)
    }

    fn series_url(&self, series: SeriesId) -> String {
        format!("{}/bcdata.sgs.{}/dados", self.base_url, series)
    }
}

impl ChunkSource for BcbClient {
    fn fetch_chunk(&self, series: SeriesId, chunk: Chunk) -> Result<ChunkOutcome, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            series,
            start: chunk.start,
            end: chunk.end,
            source: Box::new(source),
        };

        let resp = self
            .client
            .get(self.series_url(series))
            .query(&chunk_query(chunk))
            .send()
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Ok(ChunkOutcome::Failed(ChunkFailure::Status(status.as_u16())));
        }

        let body = resp.text().map_err(transport)?;
        let outcome = decode_chunk_body(&body);
        if let ChunkOutcome::Failed(ChunkFailure::Malformed(reason)) = &outcome {
            warn!(%series, start = %chunk.start, end = %chunk.end, %reason, "unreadable BCB response");
        }
        Ok(outcome)
    }
}

/// Query parameters for one window.
pub fn chunk_query(chunk: Chunk) -> [(&'static str, String); 3] {
    [
        ("formato", "json".to_string()),
        ("dataInicial", format_bcb_date(chunk.start)),
        ("dataFinal", format_bcb_date(chunk.end)),
    ]
}

/// `DD/MM/YYYY`, as the SGS API expects.
pub fn format_bcb_date(date: NaiveDate) -> String {
    date.format(BCB_DATE_FORMAT).to_string()
}

pub fn parse_bcb_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), BCB_DATE_FORMAT).ok()
}

/// Turn a success-status body into a window outcome.
///
/// An empty body, `null` or `[]` means no rows. Elements that are not an
/// object with a readable `data` field are dropped; unreadable values become
/// missing.
pub fn decode_chunk_body(body: &str) -> ChunkOutcome {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return ChunkOutcome::Empty;
    }

    let raw: Option<Vec<Value>> = match serde_json::from_str(trimmed) {
        Ok(raw) => raw,
        Err(e) => return ChunkOutcome::Failed(ChunkFailure::Malformed(e.to_string())),
    };
    let Some(raw) = raw else {
        return ChunkOutcome::Empty;
    };

    let mut rows = Vec::with_capacity(raw.len());
    for row in &raw {
        let date = row.get("data");
        let Some(date) = date.and_then(Value::as_str).and_then(parse_bcb_date) else {
            warn!(?date, "dropping row with unreadable date");
            continue;
        };
        let value = row.get("valor").and_then(parse_value);
        rows.push(Observation::new(date, value));
    }

    if rows.is_empty() {
        ChunkOutcome::Empty
    } else {
        ChunkOutcome::Rows(rows)
    }
}

/// Coerce a `valor` field to a number. Anything that isn't a finite number
/// (or a string holding one) is missing.
pub fn parse_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::String(s) => parse_value_str(s),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

pub fn parse_value_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
