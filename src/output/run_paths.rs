//! Run-scoped output locations
//!
//! Each run gets its own directory named after the keyword and the start
//! time, holding the CSV file, the log file and a `visualizations` folder.

use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};

/// Name of the chart subdirectory inside a run directory
pub const VISUALIZATION_DIR: &str = "visualizations";

/// All paths written by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// `<root>/<keyword>_<timestamp>`
    pub run_dir: PathBuf,

    /// `<run_dir>/journal_data_<timestamp>.csv`
    pub csv_path: PathBuf,

    /// `<run_dir>/scraping_log_<timestamp>.log`
    pub log_path: PathBuf,

    /// `<run_dir>/visualizations`
    pub viz_dir: PathBuf,
}

impl RunPaths {
    /// Computes the paths for a run started at `started_at`
    ///
    /// Nothing is created on disk; see [`RunPaths::create`].
    pub fn new<Tz: TimeZone>(root: &Path, keyword: &str, started_at: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let timestamp = started_at.format("%Y%m%d_%H%M%S").to_string();
        let run_dir = root.join(format!("{}_{}", dir_safe(keyword), timestamp));

        Self {
            csv_path: run_dir.join(format!("journal_data_{}.csv", timestamp)),
            log_path: run_dir.join(format!("scraping_log_{}.log", timestamp)),
            viz_dir: run_dir.join(VISUALIZATION_DIR),
            run_dir,
        }
    }

    /// Creates the run directory and its visualization subdirectory
    pub fn create(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.viz_dir)
    }
}

/// Replaces characters that would split the keyword into path components
fn dir_safe(keyword: &str) -> String {
    keyword
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}
