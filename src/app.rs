//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - loads the poll dataset once
//! - dispatches to the TUI or to the printing/export commands

use clap::Parser;

use crate::cli::{ChartArgs, Command, DataArgs, ExportArgs, ShowArgs};
use crate::data::{Dataset, DatasetLocation};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `polls` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    // We want `polls` and `polls -s forsa` to behave like `polls tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Show(args) => handle_show(args),
        Command::Sources(args) => handle_sources(args),
        Command::Export(args) => handle_export(args),
    }
}

/// `RUST_LOG` controls verbosity; warnings are shown by default.
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    // A second init (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Resolve and load the dataset for a command.
pub fn load_dataset(args: &DataArgs) -> Result<Dataset, AppError> {
    let location = DatasetLocation::from_env(args.data.as_deref());
    Dataset::load(location)
}

fn handle_tui(args: ChartArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.data)?;
    crate::tui::run(dataset, args.filters.to_filter_state())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.chart.data)?;
    let run = pipeline::run_series(&dataset, &args.chart.filters.to_filter_state());

    println!("{}", crate::report::format_run_summary(&dataset, &run));

    if !args.no_plot {
        let plot = crate::plot::render_ascii_plot(&run.series, args.width, args.height);
        println!("{plot}");
    }

    Ok(())
}

fn handle_sources(args: DataArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args)?;
    print!("{}", crate::report::format_sources(&dataset));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.chart_json.is_none() && args.csv.is_none() {
        return Err(AppError::input(
            "Nothing to export. Pass `--chart <JSON>` and/or `--csv <CSV>`.",
        ));
    }

    let dataset = load_dataset(&args.chart.data)?;
    let run = pipeline::run_series(&dataset, &args.chart.filters.to_filter_state());

    if let Some(path) = &args.chart_json {
        crate::io::chart::write_chart_json(path, &run.chart)?;
        println!("Wrote chart config: {}", path.display());
    }
    if let Some(path) = &args.csv {
        crate::io::export::write_series_csv(path, &run.series)?;
        println!("Wrote series CSV: {} ({} rows)", path.display(), run.series.len());
    }

    Ok(())
}

/// Rewrite argv so `polls` defaults to `polls tui`.
///
/// Rules:
/// - `polls`                      -> `polls tui`
/// - `polls -s forsa ...`         -> `polls tui -s forsa ...`
/// - `polls --help/--version/-h`  -> unchanged (show top-level help/version)
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

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "sources" | "export");
    if is_subcommand {
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
