//! Poll series builder: filter -> order -> labels -> per-party projection.

use std::collections::HashSet;

use chrono::Datelike;

use crate::domain::{DerivedSeries, FilterState, Party, PartySeries, PollRecord};

/// Keep records from the selected source (exact, case-sensitive match) whose
/// date falls in the selected year.
///
/// Input order is preserved.
pub fn filter_records<'a>(records: &'a [PollRecord], filters: &FilterState) -> Vec<&'a PollRecord> {
    records
        .iter()
        .filter(|r| r.source == filters.source)
        .filter(|r| filters.year.matches(r.date))
        .collect()
}

/// Sort ascending by date.
///
/// The sort is stable: records sharing a date keep their relative order.
/// Records with an unparsable date sort after every dated record.
pub fn order_records(records: &mut [&PollRecord]) {
    records.sort_by_key(|r| (r.date.is_none(), r.date));
}

/// Sparse x-axis labels, one per record.
///
/// A record gets its year as label when it is the first record of a June or
/// December `(month, year)` pair; every other position gets `""`.
pub fn derive_category_labels(records: &[&PollRecord]) -> Vec<String> {
    let mut seen: HashSet<(u32, i32)> = HashSet::new();
    records
        .iter()
        .map(|r| {
            let Some(date) = r.date else {
                return String::new();
            };
            let (month, year) = (date.month(), date.year());
            if month % 6 == 0 && seen.insert((month, year)) {
                format!("{year:04}")
            } else {
                String::new()
            }
        })
        .collect()
}

/// One value array per party (in `Party::ALL` order), aligned with `records`.
///
/// Absent values stay `None`; the renderer decides how to draw gaps.
pub fn project_series(records: &[&PollRecord]) -> Vec<PartySeries> {
    Party::ALL
        .iter()
        .map(|&party| PartySeries {
            party,
            values: records.iter().map(|r| r.values.get(party)).collect(),
        })
        .collect()
}

/// Derive chart categories and series for the current filters.
pub fn compute_series(records: &[PollRecord], filters: &FilterState) -> DerivedSeries {
    let mut selected = filter_records(records, filters);
    order_records(&mut selected);

    let categories = derive_category_labels(&selected);
    let series = project_series(&selected);
    let dates = selected.iter().map(|r| r.date).collect();

    log::debug!(
        "computed series: source={} year={} rows={}",
        filters.source,
        filters.year,
        selected.len()
    );

    DerivedSeries {
        categories,
        dates,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{PartyValues, YearFilter};

    fn record(date: &str, source: &str, afd: f64) -> PollRecord {
        PollRecord {
            date: NaiveDate::parse_from_str(date, "%d-%m-%Y").ok(),
            source: source.to_string(),
            values: PartyValues {
                afd: Some(afd),
                ..PartyValues::default()
            },
        }
    }

    fn filters(year: YearFilter, source: &str) -> FilterState {
        FilterState {
            year,
            source: source.to_string(),
        }
    }

    fn sample() -> Vec<PollRecord> {
        vec![
            record("01-06-2020", "insa", 10.0),
            record("15-12-2020", "insa", 12.0),
            record("03-03-2021", "insa", 11.0),
        ]
    }

    #[test]
    fn all_years_labels_each_half_year_once() {
        let out = compute_series(&sample(), &filters(YearFilter::All, "insa"));
        assert_eq!(out.categories, vec!["2020", "2020", ""]);
        assert_eq!(out.values(Party::Afd), &[Some(10.0), Some(12.0), Some(11.0)]);
    }

    #[test]
    fn single_year_keeps_only_that_year() {
        let out = compute_series(&sample(), &filters(YearFilter::Year(2021), "insa"));
        assert_eq!(out.categories, vec![""]);
        assert_eq!(out.values(Party::Afd), &[Some(11.0)]);
    }

    #[test]
    fn unknown_source_yields_empty_output() {
        let out = compute_series(&sample(), &filters(YearFilter::All, "forsa"));
        assert!(out.is_empty());
        assert!(out.dates.is_empty());
        assert_eq!(out.series.len(), Party::ALL.len());
        assert!(out.series.iter().all(|s| s.values.is_empty()));
    }

    #[test]
    fn repeated_half_year_is_labelled_once() {
        let records = vec![
            record("01-06-2020", "insa", 10.0),
            record("01-06-2020", "insa", 10.5),
        ];
        let out = compute_series(&records, &filters(YearFilter::All, "insa"));
        assert_eq!(out.categories, vec!["2020", ""]);
        assert_eq!(out.values(Party::Afd), &[Some(10.0), Some(10.5)]);
    }

    #[test]
    fn source_match_is_case_sensitive() {
        let records = vec![record("01-01-2020", "Insa", 9.0), record("02-01-2020", "insa", 8.0)];
        let out = compute_series(&records, &filters(YearFilter::All, "insa"));
        assert_eq!(out.values(Party::Afd), &[Some(8.0)]);
    }

    #[test]
    fn ordering_is_chronological_and_stable() {
        let records = vec![
            record("10-03-2021", "insa", 1.0),
            record("05-01-2020", "insa", 2.0),
            record("10-03-2021", "insa", 3.0),
            record("05-01-2020", "insa", 4.0),
        ];
        let out = compute_series(&records, &filters(YearFilter::All, "insa"));
        assert_eq!(
            out.values(Party::Afd),
            &[Some(2.0), Some(4.0), Some(1.0), Some(3.0)]
        );
        let dates: Vec<NaiveDate> = out.dates.iter().flatten().copied().collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn invalid_dates_sort_last_and_are_unlabelled() {
        let records = vec![
            record("not-a-date", "insa", 5.0),
            record("01-12-2022", "insa", 6.0),
        ];
        let out = compute_series(&records, &filters(YearFilter::All, "insa"));
        assert_eq!(out.values(Party::Afd), &[Some(6.0), Some(5.0)]);
        assert_eq!(out.categories, vec!["2022", ""]);
        assert_eq!(out.dates[1], None);

        let out = compute_series(&records, &filters(YearFilter::Year(2022), "insa"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn absent_values_stay_absent() {
        let records = vec![PollRecord {
            date: NaiveDate::from_ymd_opt(2023, 6, 2),
            source: "insa".to_string(),
            values: PartyValues {
                spd: Some(19.5),
                ..PartyValues::default()
            },
        }];
        let out = compute_series(&records, &filters(YearFilter::All, "insa"));
        assert_eq!(out.values(Party::Spd), &[Some(19.5)]);
        assert_eq!(out.values(Party::Linke), &[None]);
    }

    #[test]
    fn non_empty_labels_match_distinct_half_years() {
        let records = vec![
            record("01-06-2020", "insa", 1.0),
            record("20-06-2020", "insa", 1.0),
            record("01-07-2020", "insa", 1.0),
            record("04-12-2020", "insa", 1.0),
            record("18-12-2020", "insa", 1.0),
            record("07-06-2021", "insa", 1.0),
            record("01-06-2021", "forsa", 1.0),
        ];
        let out = compute_series(&records, &filters(YearFilter::All, "insa"));
        let labelled: Vec<usize> = out
            .categories
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(labelled, vec![0, 3, 5]);
        assert_eq!(out.categories[5], "2021");
    }

    #[test]
    fn outputs_are_aligned_and_repeatable() {
        let records = sample();
        let f = filters(YearFilter::All, "insa");
        let a = compute_series(&records, &f);
        let b = compute_series(&records, &f);
        assert_eq!(a, b);
        assert_eq!(a.dates.len(), a.len());
        for s in &a.series {
            assert_eq!(s.values.len(), a.len());
        }
    }
}
