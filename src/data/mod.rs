//! Poll dataset: location resolution, loading, and source discovery.

pub mod dataset;

pub use dataset::*;
