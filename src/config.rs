use crate::constants;
use crate::error::{Result, TrackerError};
use crate::types::Record;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "tracker.toml";
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub schedule: ScheduleConfig,
    pub extract: ExtractConfig,
    pub notify: NotifyConfig,
    pub archive: ArchiveConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub zip_url: String,
    pub xlsx_url: String,
    /// Member of the zip export holding the artist table
    pub html_member: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            zip_url: constants::default_zip_url(),
            xlsx_url: constants::default_xlsx_url(),
            html_member: constants::HTML_FILENAME.to_string(),
            timeout_seconds: constants::DOWNLOAD_TIMEOUT_SECS,
            user_agent: constants::USER_AGENT.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub zip_filename: String,
    pub html_filename: String,
    pub csv_filename: String,
    pub xlsx_filename: String,
    pub status_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            zip_filename: constants::ZIP_FILENAME.to_string(),
            html_filename: constants::HTML_FILENAME.to_string(),
            csv_filename: constants::CSV_FILENAME.to_string(),
            xlsx_filename: constants::XLSX_FILENAME.to_string(),
            status_path: PathBuf::from(constants::STATUS_PATH),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl OutputConfig {
    pub fn zip_path(&self) -> PathBuf {
        self.dir.join(&self.zip_filename)
    }

    pub fn html_path(&self) -> PathBuf {
        self.dir.join(&self.html_filename)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(&self.csv_filename)
    }

    pub fn xlsx_path(&self) -> PathBuf {
        self.dir.join(&self.xlsx_filename)
    }

    pub fn status_path(&self) -> PathBuf {
        self.dir.join(&self.status_path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_seconds: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_seconds: constants::UPDATE_INTERVAL_SECS }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// Row admission rules and curated lists used by the table extractor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub header_rows: usize,
    pub min_cells: usize,
    pub section_marker: String,
    pub flag_glyph: String,
    /// Every character of this string is removed from artist labels
    pub strip_chars: String,
    pub exclude: Vec<String>,
    pub overrides: Vec<Record>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            header_rows: constants::HEADER_ROWS,
            min_cells: constants::MIN_CELLS,
            section_marker: constants::SECTION_MARKER.to_string(),
            flag_glyph: constants::FLAG_GLYPH.to_string(),
            strip_chars: constants::DEFAULT_STRIP_CHARS.iter().collect(),
            exclude: constants::DEFAULT_EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect(),
            overrides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub max_chars: usize,
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            max_chars: constants::NOTIFY_MAX_CHARS,
            timeout_seconds: constants::NOTIFY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub urls: Vec<String>,
    pub delay_seconds: f64,
    pub jitter_seconds: f64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            urls: constants::default_archive_urls(),
            delay_seconds: 10.0,
            jitter_seconds: 3.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus listener, e.g. "127.0.0.1:9898"; unset disables the exporter
    pub listen_addr: Option<String>,
}

impl Config {
    /// Loads `path` if it exists, otherwise falls back to defaults. The webhook
    /// URL from the environment always wins over the file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                TrackerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            toml::from_str::<Config>(&content)?
        } else {
            info!("No config file at {}, using defaults", path.display());
            Config::default()
        };
        config.notify.webhook_url = resolve_webhook(config.notify.webhook_url.take(), std::env::var(WEBHOOK_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schedule.interval_seconds == 0 {
            return Err(TrackerError::Config("schedule.interval_seconds must be positive".into()));
        }
        if self.source.timeout_seconds == 0 {
            return Err(TrackerError::Config("source.timeout_seconds must be positive".into()));
        }
        if self.notify.max_chars <= constants::NOTIFY_TRUNCATED_MARKER.chars().count() {
            return Err(TrackerError::Config(format!(
                "notify.max_chars must exceed {} characters",
                constants::NOTIFY_TRUNCATED_MARKER.chars().count()
            )));
        }
        if self.extract.section_marker.is_empty() {
            return Err(TrackerError::Config("extract.section_marker must not be empty".into()));
        }
        Ok(())
    }
}

/// The environment wins over the file; blank values from either count as unset.
fn resolve_webhook(file: Option<String>, env: Option<String>) -> Option<String> {
    let present = |url: &Option<String>| url.as_deref().is_some_and(|u| !u.trim().is_empty());
    if present(&env) {
        env
    } else if present(&file) {
        file
    } else {
        None
    }
}
