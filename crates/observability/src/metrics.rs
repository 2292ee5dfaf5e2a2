//! 路径分发指标上报模块
//!
//! 将路由器的每路径计数快照转换为 Prometheus 指标。

use metrics::{counter, gauge};

/// Per-path dispatch counters as reported by the router.
///
/// Mirrors the router's snapshot type without depending on it; the
/// caller converts field by field (or via `From` where it owns both
/// types).
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSnapshot {
    /// Total data fanned out on the path
    pub dispatched: u64,
    /// Total successful per-sink deliveries
    pub delivered: u64,
    /// Total per-sink failures (timeouts included)
    pub failed: u64,
    /// Total per-sink deadline hits
    pub timed_out: u64,
}

/// Record one path's dispatch snapshot.
///
/// Snapshots are cumulative totals, so they are exported as gauges;
/// rate queries belong to the metrics backend.
pub fn record_path_snapshot(path: &str, snapshot: &PathSnapshot) {
    gauge!("datapath_dispatched_total", "path" => path.to_string()).set(snapshot.dispatched as f64);
    gauge!("datapath_delivered_total", "path" => path.to_string()).set(snapshot.delivered as f64);
    gauge!("datapath_failed_total", "path" => path.to_string()).set(snapshot.failed as f64);
    gauge!("datapath_timed_out_total", "path" => path.to_string()).set(snapshot.timed_out as f64);
}

/// Record one sink delivery outcome.
pub fn record_sink_delivery(module: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "datapath_sink_deliveries_total",
        "module" => module.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
