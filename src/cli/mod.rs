//! Command-line parsing for the BCB indicator dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/report code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::catalog::Indicator;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "painel", version, about = "Economic indicator dashboard (BCB SGS data)")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override the SGS API base URL (default: `BCB_BASE_URL` or the public API).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one indicator and print the table, statistics and a plot.
    Fetch(FetchArgs),
    /// List the available indicators, sub-categories, units and series ids.
    Indicators,
    /// Plot a series previously saved with `painel fetch --export-json`.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// Every change of indicator, category or date range triggers a fresh fetch.
    Tui(SelectionArgs),
}

/// Which series to fetch, and over what range.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    /// Indicator to fetch.
    #[arg(short = 'i', long, value_enum, default_value_t = Indicator::CestaBasica)]
    pub indicator: Indicator,

    /// Sub-category (municipality or sector) for indicators that have one.
    /// Defaults to the first entry.
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// First date of the range (YYYY-MM-DD). Default: 2015-01-01.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    /// Last date of the range (YYYY-MM-DD). Default: today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,
}

/// Options for `painel fetch`.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Only print the most recent N rows of the table.
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the series to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved series.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Series JSON file produced by `painel fetch --export-json`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Unit label for the y axis.
    #[arg(long, default_value = "")]
    pub unit: String,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_flags_parse() {
        let cli = Cli::try_parse_from([
            "painel", "-v", "fetch", "-i", "emprego-formal", "-c", "Comércio", "--start", "2020-01-01", "--rows", "12",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.selection.indicator, Indicator::EmpregoFormal);
        assert_eq!(args.selection.category.as_deref(), Some("Comércio"));
        assert_eq!(args.selection.start, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(args.selection.end, None);
        assert_eq!(args.rows, Some(12));
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["painel", "fetch", "--start", "01/01/2020"]).is_err());
    }
}
