use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;
use tracing::{error, info};

use super::error::Error;
use common::types::RateMatrix;

/// Reads a header-less CSV grid, one matrix row per line.
///
/// Rows may differ in length; shape and rate checks are left to the
/// graph builder so every matrix defect is reported the same way.
/// Lines starting with `#` are skipped.
pub fn read_matrix(path: &Path) -> Result<RateMatrix, Error> {
    let file = File::open(path).map_err(|e| {
        error!("Failed to read file {}: {:?}", path.display(), e);
        Error::IoError(e)
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: Vec<f64> = result?;
        rows.push(row);
    }

    info!(path = %path.display(), rows = rows.len(), "loaded rate matrix");
    Ok(RateMatrix::new(rows))
}
