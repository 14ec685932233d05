//! Command-line parsing for the poll chart tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the series/rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_SOURCE, FilterState, YearFilter};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "polls", version, about = "Sonntagsfragen zur Bundestagswahl: party polling chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive chart (year and source selectors).
    Tui(ChartArgs),
    /// Print a summary table and an ASCII line plot for the selected filters.
    Show(ShowArgs),
    /// List the polling sources present in the dataset.
    Sources(DataArgs),
    /// Write the chart configuration (JSON) and/or the derived series (CSV).
    Export(ExportArgs),
}

/// Where to read poll records from.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Dataset file (.json or .csv). Defaults to `POLLS_DATA`, then the bundled sample.
    #[arg(short = 'd', long, value_name = "PATH")]
    pub data: Option<PathBuf>,
}

/// Initial selector values.
#[derive(Debug, Args, Clone)]
pub struct FilterArgs {
    /// Year to show: `all`, 2020, 2021, 2022 or 2023.
    #[arg(short = 'y', long, default_value = "all")]
    pub year: YearFilter,

    /// Polling source (exact, case-sensitive).
    #[arg(short = 's', long, default_value = DEFAULT_SOURCE)]
    pub source: String,
}

impl FilterArgs {
    pub fn to_filter_state(&self) -> FilterState {
        FilterState {
            year: self.year,
            source: self.source.clone(),
        }
    }
}

/// Options shared by every command that renders a chart.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Options for `polls show`.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `polls export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Write the renderer configuration (categories, axes, series) as JSON.
    #[arg(long = "chart", value_name = "JSON")]
    pub chart_json: Option<PathBuf>,

    /// Write the derived series as CSV.
    #[arg(long = "csv", value_name = "CSV")]
    pub csv: Option<PathBuf>,
}
