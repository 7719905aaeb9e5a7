use crate::error::Result;
use crate::metrics;
use crate::pipeline::extract::TableExtractor;
use crate::pipeline::merge::merge_overrides;
use crate::pipeline::snapshot::sort_records;
use crate::types::Record;

/// Extracted rows plus curated overrides, in artists.csv order.
pub fn build_records(extractor: &TableExtractor, overrides: &[Record], html: &[u8]) -> Result<Vec<Record>> {
    let text = String::from_utf8_lossy(html);
    let extraction = extractor.extract_html(&text)?;
    for (reason, count) in &extraction.rejected {
        metrics::rows_rejected(reason.as_str(), *count);
    }
    let mut records = merge_overrides(extraction.records, overrides);
    sort_records(&mut records);
    Ok(records)
}
