use crate::app::archive::archive_all;
use crate::app::ports::{ArchiverPort, Delivery, HttpClientPort, NotifierPort};
use crate::config::Config;
use crate::error::Result;
use crate::infra::zip_archive::extract_member;
use crate::metrics;
use crate::pipeline::assemble;
use crate::pipeline::diff::{diff, render_message};
use crate::pipeline::extract::{ExtractRules, TableExtractor};
use crate::pipeline::snapshot;
use crate::status::{hash_bytes, ArtifactHashes, StatusInfo};
use crate::storage::write_atomic;
use crate::types::{Change, Record, Snapshot};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What one cycle remembers for the next: the html hash and the records it
/// produced. Replaced as a whole after every completed comparison.
#[derive(Debug, Clone, Default)]
pub struct CycleState {
    pub last_html_hash: Option<String>,
    pub last_snapshot: Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Fetching,
    Extracting,
    Diffing,
    Notifying,
    Persisting,
}

impl CycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStage::Fetching => "fetching",
            CycleStage::Extracting => "extracting",
            CycleStage::Diffing => "diffing",
            CycleStage::Notifying => "notifying",
            CycleStage::Persisting => "persisting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing recorded; the previous state is kept for the next cycle.
    Aborted { stage: CycleStage, error: String },
    /// First successful cycle: hashes stored, nothing announced.
    Baseline { records: usize },
    Unchanged,
    ChangedWithoutDelta,
    Notified { changes: usize, delivered: bool },
}

impl CycleOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Aborted { .. } => "aborted",
            CycleOutcome::Baseline { .. } => "baseline",
            CycleOutcome::Unchanged => "unchanged",
            CycleOutcome::ChangedWithoutDelta => "changed_without_delta",
            CycleOutcome::Notified { .. } => "notified",
        }
    }
}

struct FetchedArtifacts {
    html: Vec<u8>,
    xlsx: Vec<u8>,
}

/// Runs the fetch, extract, diff, notify and persist stages of one cycle.
pub struct Orchestrator {
    config: Config,
    http: Arc<dyn HttpClientPort>,
    notifier: Arc<dyn NotifierPort>,
    archiver: Arc<dyn ArchiverPort>,
    extractor: TableExtractor,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        http: Arc<dyn HttpClientPort>,
        notifier: Arc<dyn NotifierPort>,
        archiver: Arc<dyn ArchiverPort>,
    ) -> Self {
        let extractor = TableExtractor::new(ExtractRules::from_config(&config.extract));
        Self { config, http, notifier, archiver, extractor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run_cycle(&self, state: &mut CycleState) -> CycleOutcome {
        info!("--- Starting update cycle ---");
        metrics::cycle_started();
        let outcome = self.run_stages(state).await;
        metrics::cycle_finished(outcome.label());
        match &outcome {
            CycleOutcome::Aborted { stage, error } => {
                error!("❌ Cycle aborted while {}: {}. Skipping this cycle.", stage.as_str(), error)
            }
            other => info!("--- Update cycle finished ({}) ---", other.label()),
        }
        outcome
    }

    async fn run_stages(&self, state: &mut CycleState) -> CycleOutcome {
        let output = &self.config.output;
        let status_path = output.status_path();
        let mut status = StatusInfo::load(&status_path);

        enter(CycleStage::Fetching);
        let fetched = match self.fetch().await {
            Ok(fetched) => fetched,
            Err(e) => return aborted(CycleStage::Fetching, e),
        };

        enter(CycleStage::Extracting);
        let records = match self.build_records(&fetched.html) {
            Ok(records) => records,
            Err(e) => return aborted(CycleStage::Extracting, e),
        };
        let csv_bytes = match snapshot::save(&output.csv_path(), &records) {
            Ok(bytes) => bytes,
            Err(e) => return aborted(CycleStage::Persisting, e),
        };

        let hashes = ArtifactHashes {
            html: hash_bytes(&fetched.html),
            csv: hash_bytes(&csv_bytes),
            xlsx: hash_bytes(&fetched.xlsx),
        };
        let current: Snapshot = records.into_iter().collect();
        metrics::snapshot_size(current.len());

        enter(CycleStage::Diffing);
        let mut archived = false;
        let outcome = match state.last_html_hash.as_deref() {
            None => {
                info!("First run: storing initial file hashes.");
                CycleOutcome::Baseline { records: current.len() }
            }
            Some(previous) if previous == hashes.html => {
                info!("ℹ️ {} is unchanged.", output.html_filename);
                CycleOutcome::Unchanged
            }
            Some(_) => {
                info!("🔔 {} has changed! Checking for data differences.", output.html_filename);
                let delta = diff(&state.last_snapshot, &current);
                if delta.is_empty() {
                    info!("ℹ️ HTML hash changed, but no data differences found.");
                    CycleOutcome::ChangedWithoutDelta
                } else {
                    metrics::changes_detected(delta.len());
                    enter(CycleStage::Notifying);
                    let delivered = self.notify(&delta).await;
                    archived = self.archive().await;
                    CycleOutcome::Notified { changes: delta.len(), delivered }
                }
            }
        };

        state.last_html_hash = Some(hashes.html.clone());
        state.last_snapshot = current;

        enter(CycleStage::Persisting);
        status.record_cycle(
            (output.html_filename.as_str(), output.csv_filename.as_str(), output.xlsx_filename.as_str()),
            &hashes,
            archived,
            Utc::now(),
        );
        if let Err(e) = status.save(&status_path) {
            error!("❌ Failed to write {}: {}", status_path.display(), e);
        }
        outcome
    }

    /// Downloads the zip export and the xlsx export, writing the html member
    /// and both downloads to the output directory.
    async fn fetch(&self) -> Result<FetchedArtifacts> {
        let source = &self.config.source;
        let output = &self.config.output;
        let timeout = source.timeout();

        let zip = self.http.get(&source.zip_url, timeout).await?;
        write_atomic(&output.zip_path(), &zip)?;
        info!("📦 Extracting {} from {}...", source.html_member, output.zip_filename);
        let html = extract_member(&zip, &source.html_member)?;
        write_atomic(&output.html_path(), &html)?;
        info!("✅ Extracted {}", output.html_filename);

        let xlsx = self.http.get(&source.xlsx_url, timeout).await?;
        write_atomic(&output.xlsx_path(), &xlsx)?;
        info!("✅ Saved {}", output.xlsx_filename);

        Ok(FetchedArtifacts { html, xlsx })
    }

    /// Extracted rows plus curated overrides, in artists.csv order.
    pub fn build_records(&self, html: &[u8]) -> Result<Vec<Record>> {
        assemble::build_records(&self.extractor, &self.config.extract.overrides, html)
    }

    /// True only when the message actually went out.
    async fn notify(&self, delta: &[Change]) -> bool {
        let message = render_message(delta);
        match self.notifier.send(&message).await {
            Ok(Delivery::Sent) => {
                metrics::notification("sent");
                true
            }
            Ok(Delivery::Skipped) => {
                info!("ℹ️ {} changes detected but no notification destination is configured.", delta.len());
                metrics::notification("skipped");
                false
            }
            Err(e) => {
                error!("⚠️ Exception sending notification: {}", e);
                metrics::notification("failed");
                false
            }
        }
    }

    async fn archive(&self) -> bool {
        let config = &self.config.archive;
        if !config.enabled || config.urls.is_empty() {
            return false;
        }
        archive_all(self.archiver.as_ref(), config).await > 0
    }
}

fn enter(stage: CycleStage) {
    debug!("cycle: entering {}", stage.as_str());
}

fn aborted(stage: CycleStage, error: impl std::fmt::Display) -> CycleOutcome {
    CycleOutcome::Aborted { stage, error: error.to_string() }
}
