//! Records service coordinating the store, the summarizer, and metrics.

use crate::{
    metrics::{MetricsSnapshot, StoreMetrics},
    records::{
        store::StudentStore,
        summarize::{Summarizer, get_summarizer},
        types::{StoreError, Student, StudentId, StudentInput},
    },
};
use async_trait::async_trait;

/// Owns the student store together with the summarizer and metrics registry.
///
/// Construct the service once near process start and share it through an `Arc`; tests build
/// a fresh instance per case so no state leaks between them.
pub struct RecordsService {
    store: StudentStore,
    summarizer: Box<dyn Summarizer + Send + Sync>,
    metrics: StoreMetrics,
}

/// Abstraction over record operations used by the HTTP surface.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// Store a new student and return it with its assigned id.
    async fn create_student(&self, input: StudentInput) -> Student;

    /// Snapshot every stored student.
    async fn list_students(&self) -> Vec<Student>;

    /// Fetch one student.
    async fn get_student(&self, id: StudentId) -> Result<Student, StoreError>;

    /// Replace a student's fields, keeping its id.
    async fn update_student(
        &self,
        id: StudentId,
        input: StudentInput,
    ) -> Result<Student, StoreError>;

    /// Remove a student.
    async fn delete_student(&self, id: StudentId) -> Result<(), StoreError>;

    /// Return the student's summary, computing and caching it on first request.
    async fn student_summary(&self, id: StudentId) -> Result<String, StoreError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl Default for RecordsService {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordsService {
    /// Build a service with an empty store and the default profile summarizer.
    pub fn new() -> Self {
        Self::with_summarizer(get_summarizer())
    }

    /// Build a service with an empty store and a caller-provided summarizer.
    pub fn with_summarizer(summarizer: Box<dyn Summarizer + Send + Sync>) -> Self {
        Self {
            store: StudentStore::new(),
            summarizer,
            metrics: StoreMetrics::new(),
        }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &StudentStore {
        &self.store
    }
}

#[async_trait]
impl RecordsApi for RecordsService {
    async fn create_student(&self, input: StudentInput) -> Student {
        let student = self.store.create(input);
        self.metrics.record_created();
        tracing::info!(id = student.id, "Student created");
        student
    }

    async fn list_students(&self) -> Vec<Student> {
        let students = self.store.list();
        tracing::debug!(count = students.len(), "Listed students");
        students
    }

    async fn get_student(&self, id: StudentId) -> Result<Student, StoreError> {
        self.store.get(id)
    }

    async fn update_student(
        &self,
        id: StudentId,
        input: StudentInput,
    ) -> Result<Student, StoreError> {
        let student = self.store.update(id, input)?;
        self.metrics.record_updated();
        tracing::info!(id, "Student updated");
        Ok(student)
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), StoreError> {
        self.store.delete(id)?;
        self.metrics.record_deleted();
        tracing::info!(id, "Student deleted");
        Ok(())
    }

    async fn student_summary(&self, id: StudentId) -> Result<String, StoreError> {
        match self
            .store
            .summary_or_compute(id, self.summarizer.as_ref())
            .await
        {
            Ok(outcome) => {
                self.metrics.record_summary(outcome.cache_hit);
                tracing::debug!(id, cache_hit = outcome.cache_hit, "Summary served");
                Ok(outcome.summary)
            }
            Err(StoreError::Summary(err)) => {
                self.metrics.record_summary_failure();
                tracing::warn!(id, error = %err, "Summary generation failed");
                Err(StoreError::Summary(err))
            }
            Err(err) => Err(err),
        }
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.store.len())
    }
}
