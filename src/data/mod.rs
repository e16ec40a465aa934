//! Remote data sources.

pub mod bcb;

pub use bcb::*;
