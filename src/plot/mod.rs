//! Text plots for non-interactive output.

pub mod ascii;

pub use ascii::*;
