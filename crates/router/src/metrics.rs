//! Per-path dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single path's dispatch handler
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total data fanned out on this path
    dispatched: AtomicU64,
    /// Total successful per-sink deliveries
    delivered: AtomicU64,
    /// Total per-sink failures (timeouts included)
    failed: AtomicU64,
    /// Total per-sink deadline hits
    timed_out: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get dispatched count
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Increment dispatched count
    pub fn inc_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Get delivered count
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Increment delivered count
    pub fn inc_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get timeout count
    pub fn timed_out(&self) -> u64 {
        self.timed_out.load(Ordering::Relaxed)
    }

    /// Increment timeout count
    pub fn inc_timed_out(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            dispatched: self.dispatched(),
            delivered: self.delivered(),
            failed: self.failed(),
            timed_out: self.timed_out(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct DispatchSnapshot {
    pub dispatched: u64,
    pub delivered: u64,
    pub failed: u64,
    pub timed_out: u64,
}
