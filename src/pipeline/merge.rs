use crate::pipeline::extract::is_utility_row;
use crate::types::Record;
use std::collections::HashSet;
use tracing::debug;

/// Folds curated override rows into the extracted set.
///
/// An override is appended only if no record with its identity is present yet,
/// so sheet data always wins. Output keeps extracted order, then override order.
pub fn merge_overrides(extracted: Vec<Record>, overrides: &[Record]) -> Vec<Record> {
    let mut seen: HashSet<String> = extracted.iter().map(|r| r.identity.clone()).collect();
    let mut merged = extracted;
    for manual in overrides {
        if manual.identity.is_empty() || is_utility_row(&manual.identity) {
            debug!("merge: skipping override '{}'", manual.identity);
            continue;
        }
        if !seen.insert(manual.identity.clone()) {
            debug!("merge: override '{}' already present, keeping sheet row", manual.identity);
            continue;
        }
        merged.push(manual.clone());
    }
    merged
}
