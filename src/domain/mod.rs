//! Domain types used throughout the app.
//!
//! This module defines:
//!
//! - series identifiers and observations (`SeriesId`, `Observation`)
//! - the fetched table (`SeriesTable`) and its chunk bookkeeping
//! - date windows sent to the remote API (`Chunk`)

pub mod types;

pub use types::*;
