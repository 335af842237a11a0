use std::path::Path;

use super::filter::WorkingSubset;
use crate::error::{DashboardError, Result};

/// Write the records of a subset, derived labels included, as CSV.
///
/// The output keeps the normalised column names, so it loads back as a
/// dataset of its own.
pub fn write_csv(path: &Path, subset: &WorkingSubset<'_>) -> Result<usize> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| DashboardError::file_access(path, e))?;
    for record in subset.iter() {
        writer
            .serialize(record)
            .map_err(|e| DashboardError::file_access(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| DashboardError::file_access(path, e))?;
    log::info!("Exported {} records to {}", subset.len(), path.display());
    Ok(subset.len())
}
