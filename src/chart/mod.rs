//! Chart configuration handed to the renderer.
//!
//! The renderer (web chart widget or the TUI) consumes two things:
//! - `options`: x-axis categories plus axis presentation settings
//! - `series`: six named, coloured value arrays
//!
//! Absent values serialize as `null` so the renderer draws a gap.

use serde::{Deserialize, Serialize};

use crate::domain::DerivedSeries;

/// Chart id used by the renderer.
pub const CHART_ID: &str = "party-popularity";

/// Format a y-axis value: floor to a whole number and append `%`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format!("{}%", value.floor() as i64)
}

/// How y-axis tick values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueFormatter {
    /// `floor(v)` followed by `%`.
    FloorPercent,
}

impl ValueFormatter {
    pub fn apply(self, value: f64) -> String {
        match self {
            ValueFormatter::FloorPercent => format_percent(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMeta {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTicks {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisLabels {
    pub rotate: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxis {
    pub categories: Vec<String>,
    pub axis_ticks: AxisTicks,
    pub labels: XAxisLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxisLabels {
    pub formatter: ValueFormatter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    pub labels: YAxisLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub chart: ChartMeta,
    pub xaxis: XAxis,
    pub yaxis: YAxis,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub data: Vec<Option<f64>>,
    pub color: String,
}

/// Everything the renderer needs for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub options: ChartOptions,
    pub series: Vec<ChartSeries>,
}

/// Build the renderer configuration for derived series.
pub fn build_chart_config(derived: &DerivedSeries) -> ChartConfig {
    let options = ChartOptions {
        chart: ChartMeta {
            id: CHART_ID.to_string(),
        },
        xaxis: XAxis {
            categories: derived.categories.clone(),
            axis_ticks: AxisTicks { show: true },
            labels: XAxisLabels { rotate: 0 },
        },
        yaxis: YAxis {
            labels: YAxisLabels {
                formatter: ValueFormatter::FloorPercent,
            },
        },
    };

    let series = derived
        .series
        .iter()
        .map(|s| ChartSeries {
            name: s.party.display_name().to_string(),
            data: s.values.clone(),
            color: s.party.color_hex().to_string(),
        })
        .collect();

    ChartConfig { options, series }
}
