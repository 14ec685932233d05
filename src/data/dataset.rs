//! Poll dataset loading and source discovery.

use std::path::{Path, PathBuf};

use crate::domain::{PollRecord, RawPollRecord};
use crate::error::{AppError, EXIT_NO_DATA};
use crate::io::ingest::{load_records, read_dataset_file, read_json_records};

/// Environment variable naming the default dataset file.
pub const DATA_ENV_VAR: &str = "POLLS_DATA";

const BUNDLED_JSON: &str = include_str!("../../data/sample_polls.json");

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    /// The sample dataset compiled into the binary.
    Bundled,
    File(PathBuf),
}

impl DatasetLocation {
    /// Resolve the dataset location: `--data`, then `POLLS_DATA` (from the
    /// environment or `.env`), then the bundled sample.
    pub fn from_env(cli_path: Option<&Path>) -> Self {
        dotenvy::dotenv().ok();
        Self::resolve(cli_path, std::env::var(DATA_ENV_VAR).ok())
    }

    pub fn resolve(cli_path: Option<&Path>, env_value: Option<String>) -> Self {
        if let Some(path) = cli_path {
            return DatasetLocation::File(path.to_path_buf());
        }
        match env_value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => DatasetLocation::File(PathBuf::from(v)),
            _ => DatasetLocation::Bundled,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DatasetLocation::Bundled => "bundled sample".to_string(),
            DatasetLocation::File(path) => path.display().to_string(),
        }
    }
}

/// Parsed poll records plus the distinct sources they contain.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub location: DatasetLocation,
    pub records: Vec<PollRecord>,
    /// Distinct `source` values, in order of first appearance.
    pub sources: Vec<String>,
}

impl Dataset {
    /// Load from a resolved location.
    pub fn load(location: DatasetLocation) -> Result<Self, AppError> {
        let raw = match &location {
            DatasetLocation::Bundled => read_json_records(BUNDLED_JSON.as_bytes())?,
            DatasetLocation::File(path) => read_dataset_file(path)?,
        };
        let dataset = Self::from_raw(location, &raw)?;
        log::info!(
            "loaded {} records from {} ({} sources)",
            dataset.records.len(),
            dataset.location.describe(),
            dataset.sources.len()
        );
        Ok(dataset)
    }

    /// The sample dataset compiled into the binary.
    pub fn bundled() -> Result<Self, AppError> {
        Self::load(DatasetLocation::Bundled)
    }

    /// Build from already-read rows. Fails if there are none.
    pub fn from_raw(location: DatasetLocation, raw: &[RawPollRecord]) -> Result<Self, AppError> {
        if raw.is_empty() {
            return Err(AppError::new(
                EXIT_NO_DATA,
                format!("Dataset {} contains no records.", location.describe()),
            ));
        }
        let records = load_records(raw);
        let sources = distinct_sources(&records);
        Ok(Self {
            location,
            records,
            sources,
        })
    }

    /// Record count per source, in `sources` order.
    pub fn source_counts(&self) -> Vec<(String, usize)> {
        self.sources
            .iter()
            .map(|s| {
                let n = self.records.iter().filter(|r| &r.source == s).count();
                (s.clone(), n)
            })
            .collect()
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }
}

/// Distinct sources in order of first appearance.
pub fn distinct_sources(records: &[PollRecord]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in records {
        if !out.contains(&r.source) {
            out.push(r.source.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_SOURCE, PartyValues};

    fn raw(date: &str, source: &str) -> RawPollRecord {
        RawPollRecord {
            date: date.to_string(),
            source: source.to_string(),
            values: PartyValues::default(),
        }
    }

    #[test]
    fn sources_keep_first_appearance_order() {
        let rows = vec![
            raw("01-01-2020", "forsa"),
            raw("02-01-2020", "insa"),
            raw("03-01-2020", "forsa"),
            raw("04-01-2020", "kantar"),
        ];
        let ds = Dataset::from_raw(DatasetLocation::Bundled, &rows).unwrap();
        assert_eq!(ds.sources, vec!["forsa", "insa", "kantar"]);
        assert_eq!(
            ds.source_counts(),
            vec![
                ("forsa".to_string(), 2),
                ("insa".to_string(), 1),
                ("kantar".to_string(), 1)
            ]
        );
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let err = Dataset::from_raw(DatasetLocation::Bundled, &[]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_NO_DATA);
    }

    #[test]
    fn location_precedence() {
        let cli = PathBuf::from("cli.json");
        assert_eq!(
            DatasetLocation::resolve(Some(cli.as_path()), Some("env.csv".to_string())),
            DatasetLocation::File(cli.clone())
        );
        assert_eq!(
            DatasetLocation::resolve(None, Some("env.csv".to_string())),
            DatasetLocation::File(PathBuf::from("env.csv"))
        );
        assert_eq!(DatasetLocation::resolve(None, Some("  ".to_string())), DatasetLocation::Bundled);
        assert_eq!(DatasetLocation::resolve(None, None), DatasetLocation::Bundled);
    }

    #[test]
    fn bundled_sample_loads_with_default_source() {
        let ds = Dataset::bundled().unwrap();
        assert!(!ds.records.is_empty());
        assert!(ds.has_source(DEFAULT_SOURCE));
        assert!(ds.records.iter().all(|r| r.date.is_some()));
    }
}
