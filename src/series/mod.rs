//! Chart series derivation.
//!
//! Responsibilities:
//!
//! - filter parsed poll records by source and year
//! - order them chronologically (stable)
//! - derive sparse biannual x-axis labels
//! - project one value array per party

pub mod builder;

pub use builder::*;
