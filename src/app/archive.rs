use crate::app::ports::ArchiverPort;
use crate::config::ArchiveConfig;
use rand::Rng;
use std::time::Duration;
use tracing::{error, info};

/// Submits every configured URL for archival, one at a time with a jittered
/// pause before each. Returns how many submissions succeeded.
pub async fn archive_all(archiver: &dyn ArchiverPort, config: &ArchiveConfig) -> usize {
    info!("--- Starting archival process for all URLs ---");
    let mut archived = 0;
    for url in &config.urls {
        let delay = jittered_delay(config.delay_seconds, config.jitter_seconds);
        info!("Waiting {:.2} seconds before next archive...", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
        match archiver.archive(url).await {
            Ok(()) => archived += 1,
            Err(e) => error!("⚠️ Exception archiving {}: {}", url, e),
        }
    }
    info!("--- Archival process finished ---");
    archived
}

fn jittered_delay(base_secs: f64, jitter_secs: f64) -> Duration {
    let offset = if jitter_secs > 0.0 {
        rand::thread_rng().gen_range(-jitter_secs..=jitter_secs)
    } else {
        0.0
    };
    Duration::from_secs_f64((base_secs + offset).max(0.0))
}
