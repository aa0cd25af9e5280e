//! Engine counters for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between producers and the worker
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Entries accepted onto the queue
    enqueued: AtomicU64,
    /// Entries delivered through the synchronous fallback path
    fallback: AtomicU64,
    /// Non-empty batches flushed
    batches_flushed: AtomicU64,
    /// Entries successfully written to connections
    entries_written: AtomicU64,
    /// Connection write failures
    write_failures: AtomicU64,
}

impl EngineMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn inc_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fallback(&self) -> u64 {
        self.fallback.load(Ordering::Relaxed)
    }

    pub fn inc_fallback(&self) {
        self.fallback.fetch_add(1, Ordering::Relaxed);
    }

    pub fn batches_flushed(&self) -> u64 {
        self.batches_flushed.load(Ordering::Relaxed)
    }

    pub fn inc_batches_flushed(&self) {
        self.batches_flushed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn entries_written(&self) -> u64 {
        self.entries_written.load(Ordering::Relaxed)
    }

    pub fn add_entries_written(&self, count: u64) {
        self.entries_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    pub fn inc_write_failures(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            enqueued: self.enqueued(),
            fallback: self.fallback(),
            batches_flushed: self.batches_flushed(),
            entries_written: self.entries_written(),
            write_failures: self.write_failures(),
        }
    }
}

/// Snapshot of engine counters (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub enqueued: u64,
    pub fallback: u64,
    pub batches_flushed: u64,
    pub entries_written: u64,
    pub write_failures: u64,
}
