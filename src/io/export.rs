//! CSV export for the feasible PV/battery frontier.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sizing::{CostWeights, SizingPair};

/// Column header for frontier export.
const HEADER: &str = "pv_kw,battery_kwh,cost";

/// Exports the frontier to a CSV file at the given path.
///
/// # Arguments
///
/// * `pairs` - Feasible frontier in sweep order
/// * `costs` - Weighting used to fill the `cost` column
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_frontier_csv(pairs: &[SizingPair], costs: &CostWeights, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_frontier_csv(pairs, costs, buf)
}

/// Writes the frontier as CSV to any writer.
///
/// One row per pair, in the given order. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_frontier_csv(
    pairs: &[SizingPair],
    costs: &CostWeights,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for p in pairs {
        wtr.write_record(&[
            format!("{:.4}", p.pv),
            format!("{:.4}", p.battery),
            format!("{:.4}", costs.cost(p)),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
