//! CSV sink for collected laptop records.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::models::LaptopRecord;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not create output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Serialize records to any writer. The header row comes from the
/// record's column names; `None` fields serialize as empty cells.
pub fn write_records<W: Write>(writer: W, records: &[LaptopRecord]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write all records of a run to `path`, creating the parent directory
/// if needed. Called once per run; the caller handles the empty case.
pub fn save_records(path: &Path, records: &[LaptopRecord]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_records(file, records)?;
    info!("Saved {} laptops to {}", records.len(), path.display());
    Ok(())
}
