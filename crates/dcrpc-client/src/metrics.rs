//! Dispatch counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A serializable snapshot of [`DispatchMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchMetricsSnapshot {
    /// Requests accepted by the transport.
    pub requests_sent: u64,

    /// Commands that failed before reaching the transport.
    pub requests_rejected: u64,

    /// Deliveries matched to a pending request.
    pub responses_matched: u64,

    /// Deliveries with no pending request to go to.
    pub responses_unmatched: u64,

    /// Per-request failures reported by the transport.
    pub transport_failures: u64,

    /// Requests abandoned through cancellation or deadline.
    pub cancellations: u64,
}

/// Lock-free counters shared by the dispatcher, router and pending table.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    requests_sent: AtomicU64,
    requests_rejected: AtomicU64,
    responses_matched: AtomicU64,
    responses_unmatched: AtomicU64,
    transport_failures: AtomicU64,
    cancellations: AtomicU64,
}

impl DispatchMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_sent(&self) {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_matched(&self) {
        self.responses_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unmatched(&self) {
        self.responses_unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cancellation(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters.
    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            responses_matched: self.responses_matched.load(Ordering::Relaxed),
            responses_unmatched: self.responses_unmatched.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
        }
    }
}
