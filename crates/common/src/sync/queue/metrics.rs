use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

/// Queue counters, updated lock-free
#[derive(Debug, Default)]
pub struct QueueMetrics {
    pub total_submitted: AtomicU64,
    pub total_admitted: AtomicU64,
    pub total_completed: AtomicU64,
    pub total_failed: AtomicU64,
}

impl QueueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submit(&self) {
        self.total_submitted.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_admit(&self) {
        self.total_admitted.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_completion(&self) {
        self.total_completed.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.total_failed.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Point-in-time copy combined with the live admission gauges
    pub fn snapshot(&self, in_flight: usize, waiting: usize, max_concurrent: usize) -> QueueMetricsSnapshot {
        QueueMetricsSnapshot {
            total_submitted: self.total_submitted.load(AtomicOrdering::Acquire),
            total_admitted: self.total_admitted.load(AtomicOrdering::Acquire),
            total_completed: self.total_completed.load(AtomicOrdering::Acquire),
            total_failed: self.total_failed.load(AtomicOrdering::Acquire),
            in_flight,
            waiting,
            max_concurrent,
        }
    }
}

/// Serializable view of [`QueueMetrics`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMetricsSnapshot {
    pub total_submitted: u64,
    pub total_admitted: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub in_flight: usize,
    pub waiting: usize,
    pub max_concurrent: usize,
}

impl QueueMetricsSnapshot {
    /// Share of concurrency slots in use (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.max_concurrent == 0 {
            return 0.0;
        }
        self.in_flight as f64 / self.max_concurrent as f64
    }

    pub fn is_at_capacity(&self) -> bool {
        self.in_flight >= self.max_concurrent
    }
}
