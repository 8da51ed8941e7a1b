//! Single-column hourly series files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ProfileError;

/// Reads a one-value-per-row series from a CSV file.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the file cannot be opened or holds a
/// non-numeric row.
pub fn read_series_file(path: &Path) -> Result<Vec<f64>, ProfileError> {
    let file = File::open(path)?;
    read_series(file)
}

/// Reads a series from any reader.
///
/// Uses the last column of each row, so both `value` and `timestamp,value`
/// layouts work. A non-numeric first row is treated as a header and skipped.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidValue`] for a non-numeric data row and
/// [`ProfileError::Empty`] if nothing was read.
pub fn read_series(reader: impl Read) -> Result<Vec<f64>, ProfileError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let raw = record.iter().last().unwrap_or("");
        match raw.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) if row == 0 => {}
            Err(_) => {
                return Err(ProfileError::InvalidValue {
                    row: row + 1,
                    value: raw.to_string(),
                });
            }
        }
    }

    if values.is_empty() {
        return Err(ProfileError::Empty);
    }
    Ok(values)
}
