use crate::app::cycle::{CycleState, Orchestrator};
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Sender side stops the loop with `send(true)`; dropping it stops it too.
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Runs cycles back to back with a fixed sleep in between until shutdown is
/// signalled. The sleep does not account for how long a cycle took.
pub async fn run_loop(
    orchestrator: &Orchestrator,
    mut state: CycleState,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> CycleState {
    loop {
        if *shutdown.borrow() {
            break;
        }
        orchestrator.run_cycle(&mut state).await;

        info!("Sleeping for {} seconds...", interval.as_secs());
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("Update loop stopped");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cycle::tests::{test_config, MockArchiver, MockHttp, MockNotifier};
    use std::sync::Arc;

    #[tokio::test]
    async fn shutdown_interrupts_the_sleep() {
        let dir = tempfile::tempdir().unwrap();
        let http = Arc::new(MockHttp::default());
        let orchestrator = Orchestrator::new(
            test_config(&dir),
            http.clone(),
            Arc::new(MockNotifier::default()),
            Arc::new(MockArchiver::default()),
        );
        let (tx, rx) = shutdown_channel();

        let handle = tokio::spawn(async move {
            run_loop(&orchestrator, CycleState::default(), Duration::from_secs(3600), rx).await
        });
        // Nothing is served, so the first cycle aborts on the zip download
        while http.calls.lock().await.is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tx.send(true).unwrap();

        let state = tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
        assert!(state.last_html_hash.is_none());
        assert_eq!(http.calls.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn already_cancelled_loop_runs_no_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let http = Arc::new(MockHttp::default());
        let orchestrator = Orchestrator::new(
            test_config(&dir),
            http.clone(),
            Arc::new(MockNotifier::default()),
            Arc::new(MockArchiver::default()),
        );
        let (tx, rx) = shutdown_channel();
        tx.send(true).unwrap();

        run_loop(&orchestrator, CycleState::default(), Duration::from_millis(1), rx).await;
        assert!(http.calls.lock().await.is_empty());
    }
}
