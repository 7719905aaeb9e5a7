use crate::app::ports::HttpClientPort;
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        info!("🔄 Downloading {}", url);
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TrackerError::transport(url, e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TrackerError::transport(url, format!("status {}", status.as_u16())));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TrackerError::transport(url, e.to_string()))?
            .to_vec();
        debug!("http: {} returned {} bytes", url, bytes.len());
        Ok(bytes)
    }
}
