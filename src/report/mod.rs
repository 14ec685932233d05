//! Reporting utilities: run summaries, per-party statistics, source listings.

pub mod format;

pub use format::*;
