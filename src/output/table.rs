//! Console table of the collected records
//!
//! Prints a grid table with one row per record, followed by the locations of
//! the run's artifacts.

use crate::output::run_paths::RunPaths;
use crate::output::traits::{OutputHandler, OutputResult};
use crate::record::JournalRecord;
use comfy_table::presets::ASCII_FULL;
use comfy_table::Table;
use std::io::Write;

/// Table column headers, in display order
pub const TABLE_HEADER: [&str; 4] = ["Name", "Affiliation", "Accreditation", "Link"];

/// Prints the record table and the artifact summary to stdout
#[derive(Debug, Clone)]
pub struct ConsoleTable {
    paths: RunPaths,
}

impl ConsoleTable {
    pub fn new(paths: RunPaths) -> Self {
        Self { paths }
    }

    /// Writes the table and summary lines to any writer
    pub fn write_to<W: Write>(&self, out: &mut W, records: &[JournalRecord]) -> OutputResult<()> {
        writeln!(out, "{}", render_table(records))?;
        writeln!(out, "{}", summary_lines(&self.paths))?;
        out.flush()?;
        Ok(())
    }
}

impl OutputHandler for ConsoleTable {
    fn name(&self) -> &'static str {
        "console"
    }

    fn write(&self, records: &[JournalRecord]) -> OutputResult<()> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock, records)
    }
}

/// Renders records as an ASCII grid table
pub fn render_table(records: &[JournalRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL).set_header(TABLE_HEADER);

    for record in records {
        table.add_row([
            record.name.as_str(),
            record.affiliation.as_str(),
            record.accreditation.as_str(),
            record.link.as_str(),
        ]);
    }

    table.to_string()
}

/// The three lines naming the CSV file, chart directory and log file
pub fn summary_lines(paths: &RunPaths) -> String {
    format!(
        "Scraping completed. Data saved to {}\nVisualizations saved in {}\nLog file location: {}",
        paths.csv_path.display(),
        paths.viz_dir.display(),
        paths.log_path.display()
    )
}
