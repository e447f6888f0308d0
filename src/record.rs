//! Journal records and the per-run accumulator

use serde::Serialize;

/// One journal entry found on a results page
///
/// Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalRecord {
    /// Journal name, trimmed
    pub name: String,

    /// Link from the first anchor in the name block, empty if none
    pub link: String,

    /// Affiliation at the same position on the page, empty if missing
    pub affiliation: String,

    /// Accreditation at the same position on the page, empty if missing
    pub accreditation: String,
}

/// Ordered, append-only list of records collected during one run
///
/// Records keep page order, then on-page order. Duplicates across pages are
/// kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionResult {
    records: Vec<JournalRecord>,
    pages: u32,
}

impl CollectionResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the records of the next page
    pub fn push_page(&mut self, records: Vec<JournalRecord>) {
        self.records.extend(records);
        self.pages += 1;
    }

    /// Number of pages appended so far
    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[JournalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JournalRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a CollectionResult {
    type Item = &'a JournalRecord;
    type IntoIter = std::slice::Iter<'a, JournalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
