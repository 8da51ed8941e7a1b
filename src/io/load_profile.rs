//! Load file parsing and resampling to a canonical hourly year.

use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::ProfileError;
use crate::sizing::HOURS_PER_YEAR;

const SECONDS_PER_HOUR: i64 = 3600;

/// Timestamp layouts accepted in the first column, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// One parsed `(timestamp, load)` row.
pub type Reading = (NaiveDateTime, f64);

/// Reads a load file from disk and resamples it to [`HOURS_PER_YEAR`] hours.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the file cannot be read or parsed.
pub fn read_load_file(path: &Path) -> Result<Vec<f64>, ProfileError> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_load_file(&bytes, &name)
}

/// Parses an uploaded `timestamp,load` table into one year of hourly load (kW).
///
/// `.csv` files are read as text; `.xlsx` and `.xls` workbooks are read from
/// their first worksheet. No header row is assumed; rows whose first column
/// is not a recognisable timestamp are dropped (a header line included).
/// Load values that fail to parse count as `0`. Readings are averaged per
/// clock hour, gaps inside the covered range become `0`, and the result is
/// truncated or tiled to exactly [`HOURS_PER_YEAR`] values.
///
/// # Arguments
///
/// * `bytes` - Raw file contents
/// * `filename` - Original file name, used to pick the format
///
/// # Errors
///
/// Returns [`ProfileError::UnsupportedFormat`] for other extensions,
/// [`ProfileError::Spreadsheet`] for an unreadable workbook,
/// [`ProfileError::TooFewColumns`] if no row has two columns, and
/// [`ProfileError::NotEnoughData`] if fewer than two hours survive parsing.
pub fn parse_load_file(bytes: &[u8], filename: &str) -> Result<Vec<f64>, ProfileError> {
    let name = filename.to_ascii_lowercase();
    let readings = if name.ends_with(".csv") {
        csv_readings(bytes)?
    } else if name.ends_with(".xlsx") || name.ends_with(".xls") {
        workbook_readings(bytes)?
    } else {
        return Err(ProfileError::UnsupportedFormat(filename.to_string()));
    };

    let hourly = resample_hourly(&readings, HOURS_PER_YEAR);
    debug!(readings = readings.len(), hours = hourly.len(), "resampled load file");
    if hourly.len() < 2 {
        return Err(ProfileError::NotEnoughData(hourly.len()));
    }

    Ok(fit_to_length(&hourly, HOURS_PER_YEAR))
}

fn csv_readings(bytes: &[u8]) -> Result<Vec<Reading>, ProfileError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut max_columns = 0usize;
    let mut readings = Vec::new();
    for record in rdr.records() {
        let record = record?;
        max_columns = max_columns.max(record.len());
        let Some(ts) = record.get(0).and_then(parse_timestamp) else {
            continue;
        };
        let value = record
            .get(1)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        readings.push((ts, value));
    }

    if max_columns < 2 {
        return Err(ProfileError::TooFewColumns);
    }
    Ok(readings)
}

fn workbook_readings(bytes: &[u8]) -> Result<Vec<Reading>, ProfileError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_names = workbook.sheet_names();
    let Some(first) = sheet_names.first() else {
        return Err(ProfileError::NoWorksheet);
    };
    let range = workbook.worksheet_range(first)?;
    if range.width() < 2 {
        return Err(ProfileError::TooFewColumns);
    }

    let readings = range
        .rows()
        .filter_map(|row| {
            let ts = row.first().and_then(cell_timestamp)?;
            let value = row.get(1).and_then(cell_value).unwrap_or(0.0);
            Some((ts, value))
        })
        .collect();
    Ok(readings)
}

fn cell_timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) | Data::String(s) => parse_timestamp(s.trim()),
        _ => None,
    }
}

fn cell_value(cell: &Data) -> Option<f64> {
    let v = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Parses a timestamp in any of the accepted layouts.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Averages readings per clock hour across the covered range.
///
/// Output index 0 is the hour of the earliest reading; hours without any
/// reading are `0`. At most `max_hours` hours are produced and readings past
/// that window are ignored. Input order does not matter.
pub fn resample_hourly(readings: &[Reading], max_hours: usize) -> Vec<f64> {
    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for (ts, value) in readings {
        let hour = ts.and_utc().timestamp().div_euclid(SECONDS_PER_HOUR);
        let entry = buckets.entry(hour).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };
    let Some(window_end) = i64::try_from(max_hours)
        .ok()
        .and_then(|n| first.checked_add(n))
    else {
        return Vec::new();
    };

    (first..window_end.min(last + 1))
        .map(|h| {
            buckets
                .get(&h)
                .map_or(0.0, |&(sum, count)| sum / count as f64)
        })
        .collect()
}

/// Truncates or tiles `series` to exactly `len` values.
pub fn fit_to_length(series: &[f64], len: usize) -> Vec<f64> {
    if series.is_empty() {
        return vec![0.0; len];
    }
    series.iter().copied().cycle().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    /// Builds a one-sheet `.xlsx` holding `(timestamp, value)` rows.
    fn workbook(rows: &[(&str, f64)]) -> Vec<u8> {
        use std::io::Write;
        use zip::write::FileOptions;

        let mut sheet = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (i, (stamp, value)) in rows.iter().enumerate() {
            let r = i + 1;
            sheet.push_str(&format!(
                r#"<row r="{r}"><c r="A{r}" t="inlineStr"><is><t>{stamp}</t></is></c><c r="B{r}"><v>{value}</v></c></row>"#
            ));
        }
        sheet.push_str("</sheetData></worksheet>");

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#
                    .to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                    .to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Load" sheetId="1" r:id="rId1"/></sheets></workbook>"#
                    .to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#
                    .to_string(),
            ),
            ("xl/worksheets/sheet1.xml", sheet),
        ];

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in parts {
            writer
                .start_file(
                    name,
                    FileOptions::default().compression_method(zip::CompressionMethod::Stored),
                )
                .expect("start file");
            writer.write_all(contents.as_bytes()).expect("write part");
        }
        writer.finish().expect("finish workbook").into_inner()
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_load_file(b"x", "load.json").unwrap_err();
        assert!(matches!(err, ProfileError::UnsupportedFormat(_)));
    }

    #[test]
    fn reads_first_sheet_of_workbook() {
        let bytes = workbook(&[
            ("2023-01-01 00:00", 1.0),
            ("2023-01-01 00:30", 3.0),
            ("2023-01-01 02:00", 4.0),
        ]);
        let load = parse_load_file(&bytes, "Load.XLSX").unwrap();
        assert_eq!(load.len(), HOURS_PER_YEAR);
        assert_eq!(&load[..4], &[2.0, 0.0, 4.0, 2.0]);
    }

    #[test]
    fn workbook_and_csv_agree() {
        let rows = [
            ("2023-03-01 00:00", 0.5),
            ("2023-03-01 01:00", 1.5),
            ("2023-03-01 02:00", 2.5),
        ];
        let csv: String = rows.iter().map(|(t, v)| format!("{t},{v}\n")).collect();
        let from_csv = parse_load_file(csv.as_bytes(), "load.csv").unwrap();
        let from_xlsx = parse_load_file(&workbook(&rows), "load.xlsx").unwrap();
        assert_eq!(from_csv, from_xlsx);
    }

    #[test]
    fn corrupt_workbook_is_an_error() {
        let err = parse_load_file(b"not a workbook", "load.xlsx").unwrap_err();
        assert!(matches!(err, ProfileError::Spreadsheet(_)));
    }

    #[test]
    fn accepts_uppercase_extension() {
        let data = b"2023-01-01 00:00,1\n2023-01-01 01:00,2\n";
        assert!(parse_load_file(data, "LOAD.CSV").is_ok());
    }

    #[test]
    fn rejects_single_column() {
        let data = b"2023-01-01 00:00\n2023-01-01 01:00\n";
        let err = parse_load_file(data, "load.csv").unwrap_err();
        assert!(matches!(err, ProfileError::TooFewColumns));
    }

    #[test]
    fn rejects_single_hour() {
        let data = b"2023-01-01 00:00,1\n2023-01-01 00:30,3\n";
        let err = parse_load_file(data, "load.csv").unwrap_err();
        assert!(matches!(err, ProfileError::NotEnoughData(1)));
    }

    #[test]
    fn header_row_is_dropped_and_sub_hourly_averaged() {
        let data = b"time,kw\n\
                     2023-01-01 00:00,1\n\
                     2023-01-01 00:30,3\n\
                     2023-01-01 01:00,4\n";
        let load = parse_load_file(data, "load.csv").unwrap();
        assert_eq!(load.len(), HOURS_PER_YEAR);
        assert_eq!(&load[..4], &[2.0, 4.0, 2.0, 4.0]);
    }

    #[test]
    fn bad_values_count_as_zero() {
        let data = b"2023-01-01 00:00,abc\n2023-01-01 01:00,5\n";
        let load = parse_load_file(data, "load.csv").unwrap();
        assert_eq!(&load[..2], &[0.0, 5.0]);
    }

    #[test]
    fn gaps_fill_with_zero() {
        let readings = vec![
            (ts("2023-01-01 03:00"), 2.0),
            (ts("2023-01-01 00:15"), 1.0),
        ];
        assert_eq!(
            resample_hourly(&readings, HOURS_PER_YEAR),
            vec![1.0, 0.0, 0.0, 2.0]
        );
    }

    #[test]
    fn distant_reading_does_not_grow_past_window() {
        let readings = vec![
            (ts("1970-01-01 00:00"), 1.0),
            (ts("2969-01-01 00:00"), 2.0),
        ];
        let hourly = resample_hourly(&readings, HOURS_PER_YEAR);
        assert_eq!(hourly.len(), HOURS_PER_YEAR);
        assert_eq!(hourly[0], 1.0);
        assert!(hourly[1..].iter().all(|&v| v == 0.0));

        let data = b"1970-01-01 00:00,1\n2969-01-01 00:00,2\n";
        let load = parse_load_file(data, "load.csv").unwrap();
        assert_eq!(load.len(), HOURS_PER_YEAR);
    }

    #[test]
    fn day_first_dates_are_not_accepted() {
        assert!(parse_timestamp("03/04/2023 10:00").is_none());
    }

    #[test]
    fn long_series_truncated() {
        let series: Vec<f64> = (0..10_000).map(f64::from).collect();
        let out = fit_to_length(&series, HOURS_PER_YEAR);
        assert_eq!(out.len(), HOURS_PER_YEAR);
        assert_eq!(out[HOURS_PER_YEAR - 1], 8759.0);
    }

    #[test]
    fn short_series_tiled() {
        let out = fit_to_length(&[1.0, 2.0, 3.0], 7);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn timestamp_layouts() {
        assert!(parse_timestamp("2023-06-01T12:00:00Z").is_some());
        assert!(parse_timestamp("2023-06-01T12:00").is_some());
        assert!(parse_timestamp("2023/06/01 12:00").is_some());
        assert_eq!(parse_timestamp("2023-06-01"), Some(ts("2023-06-01 00:00:00")));
        assert!(parse_timestamp("load").is_none());
    }
}
