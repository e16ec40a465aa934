//! `painel` library crate.
//!
//! The binary (`painel`) is a thin wrapper around this library so that:
//!
//! - the chunked fetch and report logic is testable without spawning processes
//! - the CLI and the TUI share one fetch pipeline

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
