//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - read from JSON/CSV datasets
//! - used in-memory while deriving chart series
//! - exported again for the chart renderer or spreadsheets

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Years offered by the year selector (besides "All").
pub const AVAILABLE_YEARS: [i32; 4] = [2020, 2021, 2022, 2023];

/// Source selected when the chart first opens.
pub const DEFAULT_SOURCE: &str = "insa";

/// The fixed set of parties tracked by every poll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Afd,
    CduCsu,
    Fdp,
    Gruene,
    Linke,
    Spd,
}

impl Party {
    /// All parties, in chart series order.
    pub const ALL: [Party; 6] = [
        Party::Afd,
        Party::CduCsu,
        Party::Fdp,
        Party::Gruene,
        Party::Linke,
        Party::Spd,
    ];

    /// Dataset key (`values.<key>` in JSON, column name in CSV).
    pub fn key(self) -> &'static str {
        match self {
            Party::Afd => "afd",
            Party::CduCsu => "cdu_csu",
            Party::Fdp => "fdp",
            Party::Gruene => "gruene",
            Party::Linke => "linke",
            Party::Spd => "spd",
        }
    }

    /// Series name shown in the chart legend.
    pub fn display_name(self) -> &'static str {
        match self {
            Party::Afd => "AfD",
            Party::CduCsu => "Union",
            Party::Fdp => "FDP",
            Party::Gruene => "Grüne",
            Party::Linke => "Linke",
            Party::Spd => "SPD",
        }
    }

    /// Party colour as a CSS hex string.
    pub fn color_hex(self) -> &'static str {
        match self {
            Party::Afd => "#95c5dd",
            Party::CduCsu => "#000000",
            Party::Fdp => "#ffe17f",
            Party::Gruene => "#009456",
            Party::Linke => "#d04e84",
            Party::Spd => "#f15b67",
        }
    }

    /// Party colour as RGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Party::Afd => (0x95, 0xc5, 0xdd),
            Party::CduCsu => (0x00, 0x00, 0x00),
            Party::Fdp => (0xff, 0xe1, 0x7f),
            Party::Gruene => (0x00, 0x94, 0x56),
            Party::Linke => (0xd0, 0x4e, 0x84),
            Party::Spd => (0xf1, 0x5b, 0x67),
        }
    }

    /// Single character used by the ASCII plot.
    pub fn glyph(self) -> char {
        match self {
            Party::Afd => 'A',
            Party::CduCsu => 'U',
            Party::Fdp => 'F',
            Party::Gruene => 'G',
            Party::Linke => 'L',
            Party::Spd => 'S',
        }
    }
}

/// Percentages per party for one poll.
///
/// Every field is optional: a key missing from the dataset is treated as
/// absent, never as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyValues {
    pub afd: Option<f64>,
    pub cdu_csu: Option<f64>,
    pub fdp: Option<f64>,
    pub gruene: Option<f64>,
    pub linke: Option<f64>,
    pub spd: Option<f64>,
}

impl PartyValues {
    pub fn get(&self, party: Party) -> Option<f64> {
        match party {
            Party::Afd => self.afd,
            Party::CduCsu => self.cdu_csu,
            Party::Fdp => self.fdp,
            Party::Gruene => self.gruene,
            Party::Linke => self.linke,
            Party::Spd => self.spd,
        }
    }
}

/// A dataset row as stored on disk (date still in `dd-mm-yyyy` text form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPollRecord {
    pub date: String,
    pub source: String,
    #[serde(default)]
    pub values: PartyValues,
}

/// One polling data point after the load-time date parse.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRecord {
    /// Poll date; `None` when the dataset text could not be parsed.
    pub date: Option<NaiveDate>,
    /// Polling organisation (e.g. `insa`).
    pub source: String,
    pub values: PartyValues,
}

/// Year selection: everything, or one year from [`AVAILABLE_YEARS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// Whether a record dated `date` passes this filter.
    ///
    /// Records without a valid date only pass `All`.
    pub fn matches(self, date: Option<NaiveDate>) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(year) => date.is_some_and(|d| d.year() == year),
        }
    }

    /// Label for the selector ("All" or the year).
    pub fn display_name(self) -> String {
        match self {
            YearFilter::All => "All".to_string(),
            YearFilter::Year(year) => year.to_string(),
        }
    }

    /// Cycle forward through `All, 2020, ..., 2023`.
    pub fn next(self) -> Self {
        let options = Self::options();
        let idx = options.iter().position(|&o| o == self).unwrap_or(0);
        options[(idx + 1) % options.len()]
    }

    /// Cycle backward through `All, 2020, ..., 2023`.
    pub fn prev(self) -> Self {
        let options = Self::options();
        let idx = options.iter().position(|&o| o == self).unwrap_or(0);
        options[(idx + options.len() - 1) % options.len()]
    }

    /// Every selectable value, in selector order.
    pub fn options() -> Vec<YearFilter> {
        std::iter::once(YearFilter::All)
            .chain(AVAILABLE_YEARS.iter().map(|&y| YearFilter::Year(y)))
            .collect()
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => write!(f, "all"),
            YearFilter::Year(year) => write!(f, "{year:04}"),
        }
    }
}

impl FromStr for YearFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        match s.parse::<i32>() {
            Ok(year) if AVAILABLE_YEARS.contains(&year) => Ok(YearFilter::Year(year)),
            _ => {
                let years: Vec<String> = AVAILABLE_YEARS.iter().map(|y| y.to_string()).collect();
                Err(format!(
                    "Invalid year '{s}'. Expected `all` or one of: {}.",
                    years.join(", ")
                ))
            }
        }
    }
}

/// Current selector values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub year: YearFilter,
    pub source: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            year: YearFilter::All,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

/// One party's values, aligned with `DerivedSeries::categories`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartySeries {
    pub party: Party,
    pub values: Vec<Option<f64>>,
}

/// Chart-ready output of one filter evaluation.
///
/// `categories`, `dates` and every `series[i].values` have the same length:
/// position `i` always refers to the `i`-th filtered, date-ordered record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedSeries {
    /// Sparse x-axis labels: a year at the first June/December record of that
    /// half-year, empty elsewhere.
    pub categories: Vec<String>,
    pub dates: Vec<Option<NaiveDate>>,
    /// One entry per party, in [`Party::ALL`] order.
    pub series: Vec<PartySeries>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Values for one party (empty slice if the party has no series).
    pub fn values(&self, party: Party) -> &[Option<f64>] {
        self.series
            .iter()
            .find(|s| s.party == party)
            .map(|s| s.values.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_filter_parses_closed_set() {
        assert_eq!("all".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert_eq!("2021".parse::<YearFilter>().unwrap(), YearFilter::Year(2021));
        assert!("2019".parse::<YearFilter>().is_err());
        assert!("twenty".parse::<YearFilter>().is_err());
    }

    #[test]
    fn year_filter_cycles() {
        assert_eq!(YearFilter::All.next(), YearFilter::Year(2020));
        assert_eq!(YearFilter::Year(2023).next(), YearFilter::All);
        assert_eq!(YearFilter::All.prev(), YearFilter::Year(2023));
    }

    #[test]
    fn year_filter_matches_dates() {
        let d = NaiveDate::from_ymd_opt(2022, 6, 1);
        assert!(YearFilter::All.matches(d));
        assert!(YearFilter::Year(2022).matches(d));
        assert!(!YearFilter::Year(2021).matches(d));
        assert!(YearFilter::All.matches(None));
        assert!(!YearFilter::Year(2022).matches(None));
    }

    #[test]
    fn party_values_deserialize_with_missing_keys() {
        let v: PartyValues = serde_json::from_str(r#"{"afd": 10.5, "spd": 25}"#).unwrap();
        assert_eq!(v.get(Party::Afd), Some(10.5));
        assert_eq!(v.get(Party::Spd), Some(25.0));
        assert_eq!(v.get(Party::Fdp), None);
    }
}
