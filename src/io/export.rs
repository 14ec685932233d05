//! Export derived series to CSV.
//!
//! One row per chart position, meant for spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::{DerivedSeries, Party};
use crate::error::AppError;
use crate::io::ingest::DATE_FORMAT;

/// Write `label,date,afd,cdu_csu,fdp,gruene,linke,spd` rows.
///
/// Absent values and invalid dates are written as empty cells.
pub fn write_series_csv(path: &Path, derived: &DerivedSeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec!["label", "date"];
    header.extend(Party::ALL.iter().map(|p| p.key()));
    writer
        .write_record(&header)
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    for idx in 0..derived.len() {
        let mut row = Vec::with_capacity(header.len());
        row.push(derived.categories[idx].clone());
        row.push(
            derived.dates[idx]
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        );
        for party in Party::ALL {
            let value = derived.values(party).get(idx).copied().flatten();
            row.push(value.map(|v| v.to_string()).unwrap_or_default());
        }
        writer
            .write_record(&row)
            .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;

    log::info!("wrote {} series rows to {}", derived.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{FilterState, PartyValues, PollRecord};
    use crate::series::compute_series;

    #[test]
    fn export_writes_one_row_per_position() {
        let records = vec![
            PollRecord {
                date: NaiveDate::from_ymd_opt(2020, 12, 15),
                source: "insa".to_string(),
                values: PartyValues {
                    afd: Some(12.0),
                    spd: Some(15.5),
                    ..PartyValues::default()
                },
            },
            PollRecord {
                date: NaiveDate::from_ymd_opt(2020, 6, 1),
                source: "insa".to_string(),
                values: PartyValues {
                    afd: Some(10.0),
                    ..PartyValues::default()
                },
            },
        ];
        let derived = compute_series(&records, &FilterState::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        write_series_csv(&path, &derived).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let expected = concat!(
            "label,date,afd,cdu_csu,fdp,gruene,linke,spd\n",
            "2020,01-06-2020,10,,,,,\n",
            "2020,15-12-2020,12,,,,,15.5\n",
        );
        assert_eq!(text, expected);
    }
}
