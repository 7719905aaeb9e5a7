use crate::app::ports::ArchiverPort;
use crate::constants::WAYBACK_SAVE_URL;
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Submits public pages to the Wayback Machine save endpoint.
pub struct WaybackArchiver {
    client: reqwest::Client,
    save_url: String,
}

impl WaybackArchiver {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { client, save_url: WAYBACK_SAVE_URL.to_string() })
    }
}

#[async_trait]
impl ArchiverPort for WaybackArchiver {
    async fn archive(&self, url: &str) -> Result<()> {
        info!("🌐 Archiving {} ...", url);
        let target = format!("{}{}", self.save_url, url);
        let resp = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|e| TrackerError::transport(&target, e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TrackerError::transport(&target, format!("status {}", resp.status().as_u16())));
        }
        info!("✅ Archived {}", url);
        Ok(())
    }
}
