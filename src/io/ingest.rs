//! Dataset ingest and date parsing.
//!
//! This module turns a JSON or CSV poll dataset into parsed `PollRecord`s.
//!
//! Design goals:
//! - **Explicit load step**: raw rows are parsed once, into a new collection
//! - **Lenient rows**: an unparsable date is kept as `None` and logged, not rejected
//! - **Strict files**: unreadable files or malformed documents fail with exit code 2

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{PartyValues, PollRecord, RawPollRecord};
use crate::error::AppError;

/// Text format of the `date` field (`dd-mm-yyyy`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Supported on-disk dataset encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// An array of `{date, source, values: {afd, ...}}` objects.
    Json,
    /// `date,source,afd,cdu_csu,fdp,gruene,linke,spd` columns.
    Csv,
}

impl DatasetFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(DatasetFormat::Json),
            Some("csv") => Ok(DatasetFormat::Csv),
            _ => Err(AppError::input(format!(
                "Unsupported dataset file '{}'. Expected a .json or .csv file.",
                path.display()
            ))),
        }
    }
}

/// Flat CSV row; party columns may be missing or empty.
#[derive(Debug, Deserialize)]
struct CsvPollRow {
    date: String,
    source: String,
    #[serde(default)]
    afd: Option<f64>,
    #[serde(default)]
    cdu_csu: Option<f64>,
    #[serde(default)]
    fdp: Option<f64>,
    #[serde(default)]
    gruene: Option<f64>,
    #[serde(default)]
    linke: Option<f64>,
    #[serde(default)]
    spd: Option<f64>,
}

impl From<CsvPollRow> for RawPollRecord {
    fn from(row: CsvPollRow) -> Self {
        RawPollRecord {
            date: row.date,
            source: row.source,
            values: PartyValues {
                afd: row.afd,
                cdu_csu: row.cdu_csu,
                fdp: row.fdp,
                gruene: row.gruene,
                linke: row.linke,
                spd: row.spd,
            },
        }
    }
}

/// Parse a `dd-mm-yyyy` date; `None` for anything else.
pub fn parse_poll_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Convert raw rows into parsed records.
///
/// Order is preserved. Rows whose date does not parse keep a `None` date.
pub fn load_records(raw: &[RawPollRecord]) -> Vec<PollRecord> {
    raw.iter()
        .enumerate()
        .map(|(idx, row)| {
            let date = parse_poll_date(&row.date);
            if date.is_none() {
                log::warn!(
                    "record {idx} ({}): unparsable date '{}' (expected dd-mm-yyyy)",
                    row.source,
                    row.date
                );
            }
            PollRecord {
                date,
                source: row.source.clone(),
                values: row.values,
            }
        })
        .collect()
}

/// Read raw rows from a JSON array.
pub fn read_json_records<R: Read>(reader: R) -> Result<Vec<RawPollRecord>, AppError> {
    serde_json::from_reader(reader).map_err(|e| AppError::input(format!("Invalid dataset JSON: {e}")))
}

/// Read raw rows from CSV with a header line.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<RawPollRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, result) in reader.deserialize::<CsvPollRow>().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        let row = result.map_err(|e| AppError::input(format!("Invalid dataset CSV at line {line}: {e}")))?;
        out.push(row.into());
    }
    Ok(out)
}

/// Read raw rows from a dataset file, choosing the parser by extension.
pub fn read_dataset_file(path: &Path) -> Result<Vec<RawPollRecord>, AppError> {
    let path = validate_dataset_path(path)?;
    let format = DatasetFormat::from_path(&path)?;
    let file = File::open(&path)
        .map_err(|e| AppError::input(format!("Failed to open dataset '{}': {e}", path.display())))?;

    match format {
        DatasetFormat::Json => read_json_records(file),
        DatasetFormat::Csv => read_csv_records(file),
    }
}

/// Validate that the path points to an existing file.
pub fn validate_dataset_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::input(format!(
            "Dataset file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::input(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}
