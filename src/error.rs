use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Archive failure: {0}")]
    Archive(String),

    #[error("Parse failure: {0}")]
    Parse(String),

    #[error("Persistence failure for {path}: {message}")]
    Persistence { path: String, message: String },

    #[error("Notification failure: {0}")]
    Notification(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        TrackerError::Transport { url: url.to_string(), message: message.into() }
    }

    pub fn persistence(path: &std::path::Path, message: impl std::fmt::Display) -> Self {
        TrackerError::Persistence { path: path.display().to_string(), message: message.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
