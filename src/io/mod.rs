//! Input/output helpers.
//!
//! - JSON/CSV dataset ingest + date parsing (`ingest`)
//! - derived series CSV export (`export`)
//! - chart configuration JSON read/write (`chart`)

pub mod chart;
pub mod export;
pub mod ingest;

pub use chart::*;
pub use export::*;
pub use ingest::*;
