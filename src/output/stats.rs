//! Statistics over the collected records
//!
//! This module provides the value counts the charts are drawn from.

use crate::record::JournalRecord;
use std::collections::HashMap;

/// Per-run statistics summary
#[derive(Debug, Clone, Default)]
pub struct HarvestStatistics {
    /// Total number of records
    pub total_records: usize,

    /// Records with an empty link
    pub missing_links: usize,

    /// Non-empty affiliation values with their counts, most common first
    pub affiliations: Vec<(String, u64)>,

    /// Non-empty accreditation values with their counts, most common first
    pub accreditations: Vec<(String, u64)>,
}

impl HarvestStatistics {
    /// Computes statistics for a record list
    pub fn from_records(records: &[JournalRecord]) -> Self {
        Self {
            total_records: records.len(),
            missing_links: records.iter().filter(|r| r.link.is_empty()).count(),
            affiliations: value_counts(records.iter().map(|r| r.affiliation.as_str())),
            accreditations: value_counts(records.iter().map(|r| r.accreditation.as_str())),
        }
    }

    /// The `n` most common affiliations
    pub fn top_affiliations(&self, n: usize) -> &[(String, u64)] {
        &self.affiliations[..n.min(self.affiliations.len())]
    }
}

/// Counts occurrences of each non-empty value
///
/// Results are sorted by count, descending. Values with equal counts keep
/// the order in which they first appeared.
pub fn value_counts<'a, I>(values: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();

    for value in values {
        if value.is_empty() {
            continue;
        }
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
