/// Shared names and defaults for the tracker pipeline.

// Source spreadsheet exports
pub const SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1S6WwM05O277npQbaiNk-jZlXK3TdooSyWtqaWUvAI78";
pub const ZIP_EXPORT_SUFFIX: &str = "/export?format=zip";
pub const XLSX_EXPORT_SUFFIX: &str = "/export?format=xlsx";

// Generated artifacts, also the keys of the status file
pub const ZIP_FILENAME: &str = "Trackerhub.zip";
pub const HTML_FILENAME: &str = "Artists.html";
pub const CSV_FILENAME: &str = "artists.csv";
pub const XLSX_FILENAME: &str = "artists.xlsx";
pub const STATUS_PATH: &str = "info/status.json";

/// Column headers of artists.csv, in write order.
pub const CSV_HEADER: [&str; 6] = ["Artist Name", "URL", "Credit", "Links Work", "Updated", "Best"];

// Table layout of the exported sheet
pub const TABLE_BODY_SELECTOR: &str = "table.waffle tbody";
pub const HEADER_ROWS: usize = 3;
pub const MIN_CELLS: usize = 4;
pub const SECTION_MARKER: &str = "AI Models";
pub const FLAG_GLYPH: &str = "\u{1F6A9}";

pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;
pub const UPDATE_INTERVAL_SECS: u64 = 600;

// Notification sink limits
pub const NOTIFY_MAX_CHARS: usize = 2000;
pub const NOTIFY_TRUNCATED_MARKER: &str = "\n... (truncated)";
pub const NOTIFY_TIMEOUT_SECS: u64 = 10;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36";

pub const PUBLIC_BASE_URL: &str = "https://sheets.artistgrid.cx";
pub const WAYBACK_SAVE_URL: &str = "https://web.archive.org/save/";

/// Decorative code points stripped from artist labels: star, robot, masks and
/// the emoji presentation selector.
pub const DEFAULT_STRIP_CHARS: [char; 4] = ['\u{2B50}', '\u{1F916}', '\u{1F3AD}', '\u{FE0F}'];

/// Sheet rows that are tabs or tools rather than artists.
pub const DEFAULT_EXCLUDED_NAMES: [&str; 7] = [
    "AI Models",
    "\u{1F3B9} BPM & Key Tracker",
    "\u{1F3B9} Worst Comps & Edits",
    "Comps & Edits",
    "Allegations",
    "Rap Disses Timeline",
    "Underground Artists",
];

pub fn default_zip_url() -> String {
    format!("{}{}", SHEET_URL, ZIP_EXPORT_SUFFIX)
}

pub fn default_xlsx_url() -> String {
    format!("{}{}", SHEET_URL, XLSX_EXPORT_SUFFIX)
}

/// Public URLs submitted for archival after a detected change
pub fn default_archive_urls() -> Vec<String> {
    vec![
        format!("{}/", PUBLIC_BASE_URL),
        format!("{}/artists.html", PUBLIC_BASE_URL),
        format!("{}/artists.csv", PUBLIC_BASE_URL),
        format!("{}/artists.xlsx", PUBLIC_BASE_URL),
        "https://artistgrid.cx".to_string(),
    ]
}
