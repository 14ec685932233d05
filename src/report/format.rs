//! Formatted terminal output: run summary, per-party table, source list.
//!
//! We keep formatting code in one place so:
//! - the series code stays clean and testable
//! - output changes are localized (golden tests below)

use crate::app::pipeline::RunOutput;
use crate::data::Dataset;
use crate::domain::{DerivedSeries, Party};
use crate::io::ingest::DATE_FORMAT;

/// Summary statistics for one party over the selected rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyStats {
    pub party: Party,
    pub latest: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Compute latest/min/max/mean for every party, ignoring absent values.
pub fn party_stats(derived: &DerivedSeries) -> Vec<PartyStats> {
    Party::ALL
        .iter()
        .map(|&party| {
            let present: Vec<f64> = derived
                .values(party)
                .iter()
                .flatten()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            let latest = derived.values(party).iter().rev().flatten().next().copied();
            let (min, max, mean) = if present.is_empty() {
                (None, None, None)
            } else {
                let min = present.iter().copied().fold(f64::INFINITY, f64::min);
                let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let mean = present.iter().sum::<f64>() / present.len() as f64;
                (Some(min), Some(max), Some(mean))
            };
            PartyStats {
                party,
                latest,
                min,
                max,
                mean,
            }
        })
        .collect()
}

/// Format the run summary (dataset, filters, rows, date range) and party table.
pub fn format_run_summary(dataset: &Dataset, run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== Sonntagsfragen zur Bundestagswahl ===\n");
    out.push_str(&format!(
        "Dataset: {} ({} records, {} sources)\n",
        dataset.location.describe(),
        dataset.records.len(),
        dataset.sources.len()
    ));
    out.push_str(&format!(
        "Filters: year={} | source={}\n",
        run.filters.year, run.filters.source
    ));

    let first = run.series.dates.iter().flatten().next();
    let last = run.series.dates.iter().rev().flatten().next();
    let range = match (first, last) {
        (Some(a), Some(b)) => format!("[{}, {}]", a.format(DATE_FORMAT), b.format(DATE_FORMAT)),
        _ => "-".to_string(),
    };
    out.push_str(&format!("Rows: n={} | dates={range}\n", run.series.len()));

    let labels = run.series.categories.iter().filter(|c| !c.is_empty()).count();
    out.push_str(&format!("Axis labels: {labels}\n"));
    out.push('\n');

    out.push_str(&format_party_table(&party_stats(&run.series)));
    out
}

/// Format the per-party statistics table.
pub fn format_party_table(stats: &[PartyStats]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<8} {:>8} {:>8} {:>8} {:>8}\n",
            "party", "latest", "min", "max", "mean"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<8} {:-<8} {:-<8} {:-<8} {:-<8}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for s in stats {
        out.push_str(
            format!(
                "{:<8} {:>8} {:>8} {:>8} {:>8}\n",
                s.party.display_name(),
                fmt_pct(s.latest),
                fmt_pct(s.min),
                fmt_pct(s.max),
                fmt_pct(s.mean),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format distinct sources with their record counts.
pub fn format_sources(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:>8}\n", "source", "records"));
    out.push_str(&format!("{:-<24} {:->8}\n", "", ""));
    for (source, n) in dataset.source_counts() {
        out.push_str(&format!("{:<24} {:>8}\n", truncate(&source, 24), n));
    }
    out
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.1}%"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetLocation;
    use crate::domain::{FilterState, PartyValues, RawPollRecord};

    fn dataset() -> Dataset {
        let rows = vec![
            RawPollRecord {
                date: "15-12-2020".to_string(),
                source: "insa".to_string(),
                values: PartyValues {
                    afd: Some(12.0),
                    spd: Some(16.0),
                    ..PartyValues::default()
                },
            },
            RawPollRecord {
                date: "01-06-2020".to_string(),
                source: "insa".to_string(),
                values: PartyValues {
                    afd: Some(10.0),
                    ..PartyValues::default()
                },
            },
            RawPollRecord {
                date: "01-06-2020".to_string(),
                source: "forschungsgruppe_wahlen_zdf".to_string(),
                values: PartyValues::default(),
            },
        ];
        Dataset::from_raw(DatasetLocation::Bundled, &rows).unwrap()
    }

    #[test]
    fn party_stats_skip_absent_values() {
        let ds = dataset();
        let run = crate::app::pipeline::run_series(&ds, &FilterState::default());
        let stats = party_stats(&run.series);
        assert_eq!(stats[0].party, Party::Afd);
        assert_eq!(stats[0].latest, Some(12.0));
        assert_eq!(stats[0].min, Some(10.0));
        assert_eq!(stats[0].mean, Some(11.0));
        // SPD only present on the later row.
        assert_eq!(stats[5].latest, Some(16.0));
        assert_eq!(stats[5].min, Some(16.0));
        assert_eq!(stats[2].latest, None);
    }

    #[test]
    fn summary_golden_snapshot() {
        let ds = dataset();
        let run = crate::app::pipeline::run_series(&ds, &FilterState::default());
        let txt = format_run_summary(&ds, &run);
        let expected = concat!(
            "=== Sonntagsfragen zur Bundestagswahl ===\n",
            "Dataset: bundled sample (3 records, 2 sources)\n",
            "Filters: year=all | source=insa\n",
            "Rows: n=2 | dates=[01-06-2020, 15-12-2020]\n",
            "Axis labels: 2\n",
            "\n",
            "party      latest      min      max     mean\n",
            "-------- -------- -------- -------- --------\n",
            "AfD         12.0%    10.0%    12.0%    11.0%\n",
            "Union           -        -        -        -\n",
            "FDP             -        -        -        -\n",
            "Grüne           -        -        -        -\n",
            "Linke           -        -        -        -\n",
            "SPD         16.0%    16.0%    16.0%    16.0%\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn sources_table_truncates_long_names() {
        let txt = format_sources(&dataset());
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("insa "));
        assert!(lines[2].ends_with(" 2"));
        assert!(lines[3].starts_with("forschungsgruppe_wahlen."));
        assert!(lines[3].ends_with(" 1"));
    }
}
