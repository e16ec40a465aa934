//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves the indicator selection
//! - fetches the series from the BCB API
//! - prints reports/plots
//! - writes optional exports

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::catalog::{Indicator, IndicatorSeries};
use crate::cli::{Command, FetchArgs, PlotArgs, SelectionArgs};
use crate::config::Settings;
use crate::data::BcbClient;
use crate::error::AppError;

pub mod pipeline;

use pipeline::Query;

/// Entry point for the `painel` binary.
pub fn run() -> Result<(), AppError> {
    // `painel` and `painel -i ipca` behave like `painel tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let interactive = matches!(cli.command, Command::Tui(_));
    init_tracing(cli.verbose, interactive);

    let mut settings = Settings::from_env();
    if let Some(url) = cli.base_url {
        settings = settings.with_base_url(url);
    }

    match cli.command {
        Command::Fetch(args) => handle_fetch(&settings, args),
        Command::Indicators => {
            print!("{}", format_catalog());
            Ok(())
        }
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(&settings, &args),
    }
}

fn handle_fetch(settings: &Settings, args: FetchArgs) -> Result<(), AppError> {
    let query = query_from_args(&args.selection, today())?;
    let client = BcbClient::new(settings)?;
    let run = pipeline::run_query(&client, &query)?;

    println!(
        "{}",
        crate::report::format_report(&run.selection, &run.table, &run.summary, args.rows)
    );

    if !args.no_plot && !run.table.is_empty() {
        let plot = crate::plot::render_ascii_plot(&run.table, run.selection.unit(), args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &run.table)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_series_json(path, &run.table)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let table = crate::io::read_series_json(&args.series)?;
    if table.is_empty() {
        println!("{}", crate::report::NO_DATA_NOTICE);
        return Ok(());
    }
    println!(
        "{}",
        crate::plot::render_ascii_plot(&table, &args.unit, args.width, args.height)
    );
    Ok(())
}

fn handle_tui(settings: &Settings, args: &SelectionArgs) -> Result<(), AppError> {
    let query = query_from_args(args, today())?;
    crate::tui::run(settings, query)
}

/// Resolve CLI selection flags into a query. Missing dates default to
/// 2015-01-01 .. `today`.
pub fn query_from_args(args: &SelectionArgs, today: NaiveDate) -> Result<Query, AppError> {
    Query::new(
        args.indicator,
        args.category.as_deref(),
        args.start.unwrap_or_else(pipeline::default_start),
        args.end.unwrap_or(today),
    )
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Catalog listing for `painel indicators`.
pub fn format_catalog() -> String {
    let mut out = String::new();
    for indicator in Indicator::ALL {
        let cli_name = clap::ValueEnum::to_possible_value(&indicator)
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{} [{cli_name}] ({})\n",
            indicator.display_name(),
            indicator.unit()
        ));
        match indicator.series() {
            IndicatorSeries::Single(id) => out.push_str(&format!("  series {id}\n")),
            IndicatorSeries::ByCategory(table) => {
                let label = indicator.category_label().unwrap_or("Category");
                for (name, id) in table {
                    out.push_str(&format!("  {label}: {name:<28} series {id}\n"));
                }
            }
        }
    }
    out
}

/// Install the `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `-v` picks the level. The TUI owns the
/// terminal, so it stays silent unless `RUST_LOG` asks for output.
fn init_tracing(verbose: u8, interactive: bool) {
    let from_env = std::env::var("RUST_LOG").ok().filter(|v| !v.trim().is_empty());
    if interactive && from_env.is_none() {
        return;
    }

    let filter = match from_env {
        Some(spec) => EnvFilter::new(spec),
        None => EnvFilter::new(match verbose {
            0 => "painel=warn",
            1 => "painel=debug",
            _ => "trace",
        }),
    };

    let _ = tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Rewrite argv so `painel` defaults to `painel tui`.
///
/// Rules:
/// - `painel`                        -> `painel tui`
/// - `painel -i ipca ...`            -> `painel tui -i ipca ...`
/// - `painel --help/--version/-h`    -> unchanged (show top-level help/version)
/// - any argv naming a subcommand    -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let names_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "fetch" | "indicators" | "plot" | "tui"));
    if names_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(args(&["painel"])), args(&["painel", "tui"]));
        assert_eq!(
            rewrite_args(args(&["painel", "-i", "selic"])),
            args(&["painel", "tui", "-i", "selic"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        for argv in [
            args(&["painel", "--help"]),
            args(&["painel", "fetch", "-i", "ipca"]),
            args(&["painel", "-v", "fetch"]),
            args(&["painel", "indicators"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn selection_defaults_fill_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 29).unwrap();
        let selection = SelectionArgs {
            indicator: Indicator::Ipca,
            category: None,
            start: None,
            end: None,
        };
        let query = query_from_args(&selection, today).unwrap();
        assert_eq!(query.start, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(query.end, today);
        assert_eq!(query.selection.series.code(), 433);
    }

    #[test]
    fn catalog_listing_covers_every_indicator() {
        let text = format_catalog();
        for indicator in Indicator::ALL {
            assert!(text.contains(indicator.display_name()));
        }
        assert!(text.contains("[cesta-basica]"));
        assert!(text.contains("series 4189"));
        assert!(text.contains("Municipality: São Paulo"));
    }
}
