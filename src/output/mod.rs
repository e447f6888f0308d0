//! Output module for run artifacts
//!
//! This module handles:
//! - Run-scoped output paths
//! - CSV export of the collected records
//! - Affiliation and accreditation charts
//! - The console table and artifact summary

mod charts;
mod csv_output;
mod run_paths;
pub mod stats;
mod table;
mod traits;

pub use charts::{
    render_accreditation_chart, render_affiliation_chart, ChartOutput, ACCREDITATION_CHART,
    AFFILIATION_CHART, TOP_AFFILIATIONS,
};
pub use csv_output::{write_atomic, write_csv, CsvOutput, CSV_HEADER};
pub use run_paths::{RunPaths, VISUALIZATION_DIR};
pub use stats::{value_counts, HarvestStatistics};
pub use table::{render_table, summary_lines, ConsoleTable, TABLE_HEADER};
pub use traits::{OutputError, OutputHandler, OutputResult};

/// The handlers every run writes to, in order: CSV, charts, console
pub fn default_handlers(paths: &RunPaths) -> Vec<Box<dyn OutputHandler>> {
    vec![
        Box::new(CsvOutput::new(&paths.csv_path)),
        Box::new(ChartOutput::new(&paths.viz_dir)),
        Box::new(ConsoleTable::new(paths.clone())),
    ]
}
