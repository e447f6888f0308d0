//! Output handler traits and types
//!
//! This module defines the trait interface the collected records are handed
//! to once a run has finished collecting.

use crate::record::JournalRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to render chart: {0}")]
    Chart(String),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// Handlers receive the full, final record list once. A handler either
/// writes all of its artifacts or none of them.
pub trait OutputHandler {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Writes the records
    ///
    /// # Arguments
    ///
    /// * `records` - Every record of the run, in collection order
    fn write(&self, records: &[JournalRecord]) -> OutputResult<()>;
}
