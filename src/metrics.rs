//! Prometheus counters for the update loop.
//!
//! Recording is always safe; without an installed exporter the `metrics`
//! macros are no-ops.

use std::net::SocketAddr;
use tracing::{info, warn};

pub fn init_metrics(listen_addr: Option<&str>) {
    let Some(addr_str) = listen_addr else {
        info!("metrics: no listen address configured, exporter disabled");
        return;
    };
    let addr: SocketAddr = match addr_str.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("metrics: invalid listen address '{}': {}", addr_str, e);
            return;
        }
    };
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("metrics: Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("metrics: Prometheus exporter install failed (possibly already installed): {}", e),
    }
}

pub fn cycle_started() {
    ::metrics::counter!("tracker_cycles_total").increment(1);
}

pub fn cycle_finished(outcome: &'static str) {
    ::metrics::counter!("tracker_cycle_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn rows_rejected(reason: &'static str, count: usize) {
    ::metrics::counter!("tracker_rows_rejected_total", "reason" => reason).increment(count as u64);
}

pub fn snapshot_size(records: usize) {
    ::metrics::gauge!("tracker_snapshot_records").set(records as f64);
}

pub fn changes_detected(count: usize) {
    ::metrics::counter!("tracker_changes_total").increment(count as u64);
}

pub fn notification(delivery: &'static str) {
    ::metrics::counter!("tracker_notifications_total", "result" => delivery).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn recorded_values_reach_the_exporter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            cycle_started();
            rows_rejected("excluded", 3);
            snapshot_size(42);
            notification("skipped");
        });

        let rendered = handle.render();
        assert!(rendered.contains("tracker_cycles_total 1"), "{rendered}");
        assert!(rendered.contains("tracker_rows_rejected_total{reason=\"excluded\"} 3"), "{rendered}");
        assert!(rendered.contains("tracker_snapshot_records 42"), "{rendered}");
        assert!(rendered.contains("tracker_notifications_total{result=\"skipped\"} 1"), "{rendered}");
    }
}
