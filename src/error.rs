//! Error types for sizing, profile parsing, and solar resource lookup.

use thiserror::Error;

/// Failures raised by the sizing core.
///
/// An empty feasible frontier is not an error; it is reported as a
/// [`SizingOutcome`](crate::sizing::SizingOutcome) with no selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    /// A precondition on the input series or cost weights was violated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Average solar yield is zero, so the PV sweep range is undefined.
    #[error("average solar resource is zero; PV sweep range cannot be constructed")]
    ZeroAverageSolar,
}

/// Failures while turning an uploaded load file into an hourly year.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Only CSV or Excel files are supported (got \"{0}\")")]
    UnsupportedFormat(String),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("File must have at least 2 columns: timestamp and load")]
    TooFewColumns,

    #[error("Not enough valid data: {0} hourly value(s) after resampling")]
    NotEnoughData(usize),

    #[error("row {row}: \"{value}\" is not a number")]
    InvalidValue { row: usize, value: String },

    #[error("series is empty")]
    Empty,

    #[error("failed to read workbook: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while obtaining the per-kW solar series.
#[derive(Debug, Error)]
pub enum SolarError {
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("solar resource request failed: {0}")]
    Request(String),

    #[error("malformed solar resource response: {0}")]
    Malformed(String),

    #[error("Expected {expected} hourly points from solar resource, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },

    #[error("failed to read solar series: {0}")]
    File(#[from] ProfileError),
}

/// Any failure along the upload -> fetch -> size pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Solar(#[from] SolarError),

    #[error(transparent)]
    Sizing(#[from] SizingError),

    #[error("sizing task failed: {0}")]
    Task(String),
}
