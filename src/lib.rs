//! `bundestag-polls` library crate.
//!
//! The binary (`polls`) is a thin wrapper around this library so that:
//!
//! - the series derivation is testable without spawning processes or a terminal
//! - the chart configuration can be reused by other renderers
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod series;
pub mod tui;
