use crate::constants::CSV_HEADER;
use crate::error::{Result, TrackerError};
use crate::storage::write_atomic;
use crate::types::{featured_flag, Record, Snapshot};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info, warn};

/// Presentation order of artists.csv: featured rows first, then by name
/// ignoring case. The sort is stable.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(compare_records);
}

fn compare_records(a: &Record, b: &Record) -> Ordering {
    b.featured
        .cmp(&a.featured)
        .then_with(|| a.identity.to_lowercase().cmp(&b.identity.to_lowercase()))
}

/// Renders records as artists.csv: header row, every field quoted, `\n` rows.
pub fn render_csv(records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for r in records {
        writer.write_record([
            r.identity.as_str(),
            r.link.as_str(),
            r.credit.as_str(),
            r.availability.as_str(),
            r.last_updated.as_str(),
            featured_flag(r.featured),
        ])?;
    }
    writer.into_inner().map_err(|e| TrackerError::Io(e.into_error()))
}

/// Overwrites `path` with the rendered records and returns the bytes written.
pub fn save(path: &Path, records: &[Record]) -> Result<Vec<u8>> {
    let bytes = render_csv(records)?;
    write_atomic(path, &bytes)?;
    info!("✅ Generated {} with {} rows", path.display(), records.len());
    Ok(bytes)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Artist Name", default)]
    identity: String,
    #[serde(rename = "URL", default)]
    link: String,
    #[serde(rename = "Credit", default)]
    credit: String,
    #[serde(rename = "Links Work", default)]
    availability: String,
    #[serde(rename = "Updated", default)]
    last_updated: String,
    #[serde(rename = "Best", default)]
    best: String,
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        Record {
            identity: row.identity,
            link: row.link,
            credit: row.credit,
            availability: row.availability,
            last_updated: row.last_updated,
            featured: row.best == "Yes",
        }
    }
}

/// Parses artists.csv content, mapping columns by header name.
pub fn parse_csv(bytes: &[u8]) -> Result<Snapshot> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let mut snapshot = Snapshot::new();
    for row in reader.deserialize::<CsvRow>() {
        snapshot.insert(Record::from(row?));
    }
    Ok(snapshot)
}

/// Reads a snapshot back from disk. A missing or unreadable file yields an
/// empty snapshot instead of an error.
pub fn load(path: &Path) -> Snapshot {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("CSV file not found: {}", path.display());
            return Snapshot::new();
        }
        Err(e) => {
            error!("Error reading CSV file {}: {}", path.display(), e);
            return Snapshot::new();
        }
    };
    match parse_csv(&bytes) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Malformed CSV file {}: {}; treating as empty", path.display(), e);
            Snapshot::new()
        }
    }
}
