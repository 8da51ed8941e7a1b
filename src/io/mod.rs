//! File input and output around the sizing core.

pub mod export;
/// Uploaded load files to an hourly year.
pub mod load_profile;
pub mod series;
