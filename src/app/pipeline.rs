//! Shared "series pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! parsed dataset -> filter/order -> labels + series -> chart configuration
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::chart::{ChartConfig, build_chart_config};
use crate::data::Dataset;
use crate::domain::{DerivedSeries, FilterState};

/// All computed outputs for one filter selection.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub filters: FilterState,
    pub series: DerivedSeries,
    pub chart: ChartConfig,
}

/// Derive series and chart configuration for the given filters.
///
/// Recomputed from scratch on every call; nothing is cached between selections.
pub fn run_series(dataset: &Dataset, filters: &FilterState) -> RunOutput {
    if !dataset.has_source(&filters.source) {
        log::warn!(
            "source '{}' not present in dataset (available: {})",
            filters.source,
            dataset.sources.join(", ")
        );
    }

    let series = crate::series::compute_series(&dataset.records, filters);
    let chart = build_chart_config(&series);

    RunOutput {
        filters: filters.clone(),
        series,
        chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetLocation;
    use crate::domain::{RawPollRecord, PartyValues, YearFilter};

    fn dataset() -> Dataset {
        let rows: Vec<RawPollRecord> = [
            ("01-06-2020", "insa", 10.0),
            ("15-12-2020", "insa", 12.0),
            ("03-03-2021", "insa", 11.0),
            ("05-06-2020", "forsa", 9.0),
        ]
        .iter()
        .map(|&(date, source, afd)| RawPollRecord {
            date: date.to_string(),
            source: source.to_string(),
            values: PartyValues {
                afd: Some(afd),
                ..PartyValues::default()
            },
        })
        .collect();
        Dataset::from_raw(DatasetLocation::Bundled, &rows).unwrap()
    }

    #[test]
    fn chart_matches_series() {
        let run = run_series(&dataset(), &FilterState::default());
        assert_eq!(run.series.len(), 3);
        assert_eq!(run.chart.options.xaxis.categories, run.series.categories);
        assert_eq!(run.chart.series[0].data, vec![Some(10.0), Some(12.0), Some(11.0)]);
    }

    #[test]
    fn missing_source_is_not_an_error() {
        let filters = FilterState {
            year: YearFilter::All,
            source: "allensbach".to_string(),
        };
        let run = run_series(&dataset(), &filters);
        assert!(run.series.is_empty());
        assert!(run.chart.series.iter().all(|s| s.data.is_empty()));
    }
}
