//! CSV export of the collected records
//!
//! The file is written to a temporary file in the destination directory and
//! renamed into place after a successful flush, so a failed export never
//! leaves a partial CSV behind.

use crate::output::traits::{OutputHandler, OutputResult};
use crate::record::JournalRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Column header, in `JournalRecord` field order
pub const CSV_HEADER: [&str; 4] = ["name", "link", "affiliation", "accreditation"];

/// Writes all records to one CSV file
#[derive(Debug, Clone)]
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for CsvOutput {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, records: &[JournalRecord]) -> OutputResult<()> {
        write_atomic(&self.path, |file| write_csv(file, records))?;
        tracing::info!("Data saved to {}", self.path.display());
        Ok(())
    }
}

/// Serializes records as CSV with a header row
///
/// The header is written even when there are no records.
pub fn write_csv<W: Write>(writer: W, records: &[JournalRecord]) -> OutputResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a file through a sibling temporary file, then renames it into place
///
/// `fill` receives the open temporary file. If it fails, the temporary file
/// is removed and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, fill: F) -> OutputResult<()>
where
    F: FnOnce(&mut std::fs::File) -> OutputResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    fill(temp.as_file_mut())?;
    temp.as_file_mut().sync_all()?;
    temp.persist(path)?;

    Ok(())
}
