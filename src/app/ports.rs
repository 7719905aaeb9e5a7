use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

// Collaborators of the update cycle. Production adapters live in `infra`.

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Downloads `url`, failing on transport errors, timeouts and non-2xx status.
    async fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>>;
}

/// What a notifier did with a message it did not fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No destination configured; nothing left the process.
    Skipped,
}

#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn send(&self, content: &str) -> Result<Delivery>;
}

#[async_trait]
pub trait ArchiverPort: Send + Sync {
    /// Asks a web archive to snapshot `url`.
    async fn archive(&self, url: &str) -> Result<()>;
}
