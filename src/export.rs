//! Delimited-text export of a filtered view.
//!
//! The export carries the header row and every row of the view with its cells
//! exactly as they were read, in the file's column order. There is no index
//! column.

use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::filter::FilteredView;

pub const EXPORT_FILE_NAME: &str = "aadhaar_enrollment_filtered.csv";

pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(view.dataset().headers())?;
    for record in view.rows() {
        writer.write_record(&record.raw)?;
    }
    writer.flush()?;
    Ok(())
}

/// UTF-8 bytes of the export, for hosts that serve it as a download.
pub fn to_csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(view, &mut buffer)?;
    Ok(buffer)
}

pub fn write_file(view: &FilteredView<'_>, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(view, file).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("exported {} records to {}", view.len(), path.display());
    Ok(())
}
