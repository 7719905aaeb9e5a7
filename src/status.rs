use crate::error::Result;
use crate::storage::write_atomic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Hex encoded sha256 of an artifact.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    #[serde(default)]
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_archived: Option<String>,
}

/// Contents of info/status.json, served read-only by the file server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub files: BTreeMap<String, FileStatus>,
}

/// Artifact hashes of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHashes {
    pub html: String,
    pub csv: String,
    pub xlsx: String,
}

impl StatusInfo {
    /// Reads the status file; absent or corrupt files give a default record.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("status: {} is corrupt ({}), starting fresh", path.display(), e);
                StatusInfo::default()
            }),
            Err(_) => StatusInfo::default(),
        }
    }

    /// Stamps the cycle time and the artifact hashes. The html entry keeps its
    /// archive timestamp unless this cycle archived again.
    pub fn record_cycle(
        &mut self,
        names: (&str, &str, &str),
        hashes: &ArtifactHashes,
        archived: bool,
        now: DateTime<Utc>,
    ) {
        let (html_name, csv_name, xlsx_name) = names;
        let now_iso = now.to_rfc3339();
        self.last_updated = now_iso.clone();

        let html = self.files.entry(html_name.to_string()).or_default();
        html.hash = hashes.html.clone();
        if archived {
            html.last_archived = Some(now_iso);
        }
        self.files.insert(csv_name.to_string(), FileStatus { hash: hashes.csv.clone(), last_archived: None });
        self.files.insert(xlsx_name.to_string(), FileStatus { hash: hashes.xlsx.clone(), last_archived: None });
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &json)
    }
}
