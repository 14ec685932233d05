//! Read/write chart configuration JSON files.
//!
//! The chart JSON is the hand-off to an external renderer: category labels,
//! axis settings and the six party series. The schema is `chart::ChartConfig`.

use std::fs::File;
use std::path::Path;

use crate::chart::ChartConfig;
use crate::error::AppError;

/// Write a chart configuration as pretty JSON.
pub fn write_chart_json(path: &Path, config: &ChartConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create chart JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, config)
        .map_err(|e| AppError::runtime(format!("Failed to write chart JSON: {e}")))?;

    log::info!("wrote chart config to {}", path.display());
    Ok(())
}

/// Read a chart configuration JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    let config: ChartConfig =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid chart JSON: {e}")))?;
    Ok(config)
}
