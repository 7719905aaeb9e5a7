use crate::app::ports::{Delivery, NotifierPort};
use crate::config::NotifyConfig;
use crate::constants::NOTIFY_TRUNCATED_MARKER;
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Cuts `content` to at most `max_chars` characters, ending with the
/// truncation marker when anything was dropped.
pub fn truncate_message(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let keep = max_chars.saturating_sub(NOTIFY_TRUNCATED_MARKER.chars().count());
    let mut out: String = content.chars().take(keep).collect();
    out.push_str(NOTIFY_TRUNCATED_MARKER);
    out
}

/// Posts change messages to a Discord webhook.
pub struct DiscordWebhook {
    client: reqwest::Client,
    url: Option<String>,
    max_chars: usize,
    timeout: Duration,
}

impl DiscordWebhook {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.webhook_url.clone().filter(|u| !u.trim().is_empty()),
            max_chars: config.max_chars,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl NotifierPort for DiscordWebhook {
    async fn send(&self, content: &str) -> Result<Delivery> {
        let Some(url) = &self.url else {
            warn!("Discord webhook URL not set. Skipping notification.");
            return Ok(Delivery::Skipped);
        };
        let body = serde_json::json!({ "content": truncate_message(content, self.max_chars) });
        let resp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| TrackerError::Notification(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TrackerError::Notification(format!("webhook returned {}", resp.status().as_u16())));
        }
        info!("✅ Discord notification sent successfully.");
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_untouched() {
        assert_eq!(truncate_message("hello", 2000), "hello");
        let exact = "a".repeat(2000);
        assert_eq!(truncate_message(&exact, 2000), exact);
    }

    #[test]
    fn long_messages_are_capped_with_marker() {
        let long = "✏️".repeat(1500);
        let out = truncate_message(&long, 2000);
        assert_eq!(out.chars().count(), 2000);
        assert!(out.ends_with(NOTIFY_TRUNCATED_MARKER));
    }

    #[tokio::test]
    async fn missing_webhook_is_skipped_not_sent() {
        let notifier = DiscordWebhook::new(&NotifyConfig::default());
        assert_eq!(notifier.send("anything").await.unwrap(), Delivery::Skipped);
    }
}
