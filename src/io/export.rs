//! Export a fetched series to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::SeriesTable;
use crate::error::AppError;

/// Write `date,value` rows (ISO dates, empty field for missing values).
pub fn write_series_csv(path: &Path, table: &SeriesTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["date", "value"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in &table.rows {
        let value = row.value.map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([row.date.to_string(), value])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write the whole table (series id, range, rows, window tally) as pretty JSON.
pub fn write_series_json(path: &Path, table: &SeriesTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, table)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// Read a table previously written by `write_series_json`.
pub fn read_series_json(path: &Path) -> Result<SeriesTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Observation, SeriesId};

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("painel-{}-{name}", std::process::id()))
    }

    fn sample() -> SeriesTable {
        let d = |day| NaiveDate::from_ymd_opt(2023, 6, day).unwrap();
        let mut table = SeriesTable::empty(SeriesId::new(1).unwrap(), d(1), d(30));
        table.rows = vec![
            Observation::new(d(1), Some(4.5)),
            Observation::new(d(2), None),
        ];
        table
    }

    #[test]
    fn csv_has_iso_dates_and_blank_missing() {
        let path = scratch("export.csv");
        write_series_csv(&path, &sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(text, "date,value\n2023-06-01,4.5\n2023-06-02,\n");
    }

    #[test]
    fn json_reads_back() {
        let path = scratch("export.json");
        let table = sample();
        write_series_json(&path, &table).unwrap();
        let back = read_series_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back, table);
    }

    #[test]
    fn unwritable_path_is_input_error() {
        let path = scratch("missing-dir").join("out.csv");
        let err = write_series_csv(&path, &sample()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
