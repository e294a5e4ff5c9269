use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing store activity.
#[derive(Default)]
pub struct StoreMetrics {
    students_created: AtomicU64,
    students_updated: AtomicU64,
    students_deleted: AtomicU64,
    summaries_generated: AtomicU64,
    summary_cache_hits: AtomicU64,
    summary_failures: AtomicU64,
}

impl StoreMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly created student.
    pub fn record_created(&self) {
        self.students_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful update.
    pub fn record_updated(&self) {
        self.students_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delete.
    pub fn record_deleted(&self) {
        self.students_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a summary request, distinguishing fresh computations from cache hits.
    pub fn record_summary(&self, cache_hit: bool) {
        if cache_hit {
            self.summary_cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.summaries_generated.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a summarizer failure.
    pub fn record_summary_failure(&self) {
        self.summary_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters alongside the live record count.
    pub fn snapshot(&self, students_stored: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            students_stored: students_stored as u64,
            students_created: self.students_created.load(Ordering::Relaxed),
            students_updated: self.students_updated.load(Ordering::Relaxed),
            students_deleted: self.students_deleted.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            summary_cache_hits: self.summary_cache_hits.load(Ordering::Relaxed),
            summary_failures: self.summary_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of store counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of students currently held by the store.
    pub students_stored: u64,
    /// Students created since startup.
    pub students_created: u64,
    /// Successful updates since startup.
    pub students_updated: u64,
    /// Successful deletes since startup.
    pub students_deleted: u64,
    /// Summary requests that ran the summarizer.
    pub summaries_generated: u64,
    /// Summary requests answered from the cached value.
    pub summary_cache_hits: u64,
    /// Summary requests that failed in the summarizer.
    pub summary_failures: u64,
}
