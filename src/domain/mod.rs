//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parties and their presentation attributes (`Party`)
//! - raw and parsed poll records (`RawPollRecord`, `PollRecord`)
//! - selector state (`YearFilter`, `FilterState`)
//! - chart-ready output (`DerivedSeries`)

pub mod types;

pub use types::*;
