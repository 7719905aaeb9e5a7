use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One artist row of the tracker, keyed by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub identity: String,
    pub link: String,
    pub credit: String,
    pub availability: String,
    pub last_updated: String,
    pub featured: bool,
}

impl Record {
    /// The `Best` column value.
    pub fn featured_flag(&self) -> &'static str {
        featured_flag(self.featured)
    }
}

pub fn featured_flag(featured: bool) -> &'static str {
    if featured {
        "Yes"
    } else {
        "No"
    }
}

/// Full record set of one cycle, keyed by identity.
///
/// The ordered map keeps identities sorted, which the change detector relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: BTreeMap<String, Record>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any previous one with the same identity.
    /// Records with an empty identity are dropped and `false` is returned.
    pub fn insert(&mut self, record: Record) -> bool {
        if record.identity.is_empty() {
            return false;
        }
        self.records.insert(record.identity.clone(), record);
        true
    }

    pub fn get(&self, identity: &str) -> Option<&Record> {
        self.records.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identities in ascending order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl FromIterator<Record> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

/// Compared fields of a record, in the order changes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Link,
    Credit,
    Availability,
    LastUpdated,
    Featured,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Link,
        Field::Credit,
        Field::Availability,
        Field::LastUpdated,
        Field::Featured,
    ];

    /// Column header of this field in artists.csv
    pub fn column(&self) -> &'static str {
        match self {
            Field::Link => "URL",
            Field::Credit => "Credit",
            Field::Availability => "Links Work",
            Field::LastUpdated => "Updated",
            Field::Featured => "Best",
        }
    }

    pub fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Field::Link => &record.link,
            Field::Credit => &record.credit,
            Field::Availability => &record.availability,
            Field::LastUpdated => &record.last_updated,
            Field::Featured => record.featured_flag(),
        }
    }
}

/// A single entry of a delta between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    Added(String),
    Removed(String),
    FieldChanged(String, Field),
}

impl Change {
    pub fn identity(&self) -> &str {
        match self {
            Change::Added(id) | Change::Removed(id) | Change::FieldChanged(id, _) => id,
        }
    }
}

pub type Delta = Vec<Change>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identity: &str) -> Record {
        Record {
            identity: identity.to_string(),
            link: String::new(),
            credit: String::new(),
            availability: String::new(),
            last_updated: String::new(),
            featured: false,
        }
    }

    #[test]
    fn snapshot_drops_empty_identity() {
        let mut snapshot = Snapshot::new();
        assert!(!snapshot.insert(record("")));
        assert!(snapshot.insert(record("Artist")));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn snapshot_keeps_one_record_per_identity() {
        let mut second = record("Artist");
        second.credit = "newer".to_string();
        let snapshot: Snapshot = vec![record("Artist"), second].into_iter().collect();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("Artist").unwrap().credit, "newer");
    }

    #[test]
    fn featured_field_reads_as_flag() {
        let mut r = record("Artist");
        assert_eq!(Field::Featured.value(&r), "No");
        r.featured = true;
        assert_eq!(Field::Featured.value(&r), "Yes");
    }
}
