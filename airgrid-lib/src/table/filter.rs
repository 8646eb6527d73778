//! Client-side search and facet filtering.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::Column;
use super::natural_cmp;
use crate::model::Record;

/// Returns `true` if `record` matches `search` in any searchable column.
///
/// `search` is trimmed first; a record matches when the string form of a
/// searchable field, lower-cased, contains the trimmed, lower-cased search.
/// Columns with a custom renderer are skipped. A blank search matches
/// everything.
pub fn record_matches(record: &Record, columns: &[Column], search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty() || matches_needle(record, columns, &needle)
}

/// Returns the indices of `records` matching `search`, in original order.
///
/// Matching follows [`record_matches`].
pub fn filter_indices(records: &[Record], columns: &[Column], search: &str) -> Vec<usize> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return (0..records.len()).collect();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_needle(record, columns, &needle))
        .map(|(i, _)| i)
        .collect()
}

fn matches_needle(record: &Record, columns: &[Column], needle: &str) -> bool {
    columns
        .iter()
        .filter(|c| !c.has_renderer())
        .any(|c| record.text(c.key()).to_lowercase().contains(needle))
}

/// A constraint on one field, applied together with the search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetFilter {
    /// The field's string form equals this value exactly.
    Equals(String),
    /// The field is filled in with something other than a "none" or "n/a"
    /// marker, e.g. a free tier that is actually offered.
    Available,
}

impl FacetFilter {
    /// Returns `true` if `record`'s `key` field passes this filter.
    pub fn matches(&self, record: &Record, key: &str) -> bool {
        let text = record.text(key);
        match self {
            FacetFilter::Equals(expected) => *text == **expected,
            FacetFilter::Available => {
                let lower = text.trim().to_lowercase();
                !lower.is_empty() && !lower.contains("none") && !lower.contains("n/a")
            }
        }
    }
}

/// Returns `true` if `record` passes every facet.
pub fn facets_match(record: &Record, facets: &BTreeMap<String, FacetFilter>) -> bool {
    facets.iter().all(|(key, filter)| filter.matches(record, key))
}

/// Returns the distinct, non-blank string forms of `key` across `records`,
/// in natural order.
pub fn facet_values(records: &[Record], key: &str) -> Vec<String> {
    let distinct: BTreeSet<String> = records
        .iter()
        .map(|r| r.text(key))
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.into_owned())
        .collect();
    let mut values: Vec<String> = distinct.into_iter().collect();
    // stable over the BTreeSet order, so case-only duplicates stay deterministic
    values.sort_by(|a, b| natural_cmp(a, b));
    values
}
