//! In-memory student store guarded by a single mutex.
//!
//! All state (the record map and the id counter) lives behind one lock, so every operation is
//! linearizable with respect to lock acquisition. Reads hand out clones. The lock is never held
//! across an `.await`: summary computation snapshots the record, releases the lock, runs the
//! summarizer, and re-acquires the lock only to write the result back.

use super::summarize::Summarizer;
use super::types::{StoreError, Student, StudentId, StudentInput};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of a summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Summary returned to the caller.
    pub summary: String,
    /// Whether the summary was served from the cache without running the summarizer.
    pub cache_hit: bool,
}

struct Entry {
    student: Student,
    revision: u64,
}

struct StoreState {
    students: BTreeMap<StudentId, Entry>,
    next_id: StudentId,
}

/// Exclusive-access collection of students plus the id counter.
pub struct StudentStore {
    state: Mutex<StoreState>,
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentStore {
    /// Create an empty store whose first assigned id is `1`.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                students: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    // No operation panics while mutating, so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new student, assigning the next id.
    pub fn create(&self, input: StudentInput) -> Student {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let student = input.into_student(id);
        state.students.insert(
            id,
            Entry {
                student: student.clone(),
                revision: 0,
            },
        );
        tracing::debug!(id, "Created student");
        student
    }

    /// Snapshot every stored student in ascending id order.
    pub fn list(&self) -> Vec<Student> {
        self.lock()
            .students
            .values()
            .map(|entry| entry.student.clone())
            .collect()
    }

    /// Number of students currently stored.
    pub fn len(&self) -> usize {
        self.lock().students.len()
    }

    /// Whether the store holds no students.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a student by id.
    pub fn get(&self, id: StudentId) -> Result<Student, StoreError> {
        self.lock()
            .students
            .get(&id)
            .map(|entry| entry.student.clone())
            .ok_or(StoreError::NotFound(id))
    }

    /// Replace every field of a student except its id.
    ///
    /// A cached summary is dropped unless `input` supplies one.
    pub fn update(&self, id: StudentId, input: StudentInput) -> Result<Student, StoreError> {
        let mut state = self.lock();
        let entry = state
            .students
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        entry.student = input.into_student(id);
        entry.revision += 1;
        tracing::debug!(id, revision = entry.revision, "Updated student");
        Ok(entry.student.clone())
    }

    /// Remove a student. Its id is never handed out again.
    pub fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.students.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        tracing::debug!(id, "Deleted student");
        Ok(())
    }

    /// Return the cached summary, computing and caching it on first request.
    ///
    /// The summarizer runs outside the lock, so concurrent first requests for one id may each
    /// run it; the first write-back wins and later writers return the cached value. A result
    /// computed against a record that was updated or deleted meanwhile is returned but not
    /// cached, and a deleted record is never reinserted.
    pub async fn summary_or_compute(
        &self,
        id: StudentId,
        summarizer: &dyn Summarizer,
    ) -> Result<SummaryOutcome, StoreError> {
        let (snapshot, revision) = {
            let state = self.lock();
            let entry = state.students.get(&id).ok_or(StoreError::NotFound(id))?;
            if let Some(summary) = &entry.student.summary {
                return Ok(SummaryOutcome {
                    summary: summary.clone(),
                    cache_hit: true,
                });
            }
            (entry.student.clone(), entry.revision)
        };

        let computed = summarizer.summarize(&snapshot).await?;

        let mut state = self.lock();
        let Some(entry) = state.students.get_mut(&id) else {
            tracing::debug!(id, "Student deleted during summary computation; not caching");
            return Ok(SummaryOutcome {
                summary: computed,
                cache_hit: false,
            });
        };
        if entry.revision != revision {
            tracing::debug!(id, "Student updated during summary computation; not caching");
            return Ok(SummaryOutcome {
                summary: computed,
                cache_hit: false,
            });
        }
        if let Some(existing) = &entry.student.summary {
            return Ok(SummaryOutcome {
                summary: existing.clone(),
                cache_hit: false,
            });
        }
        if !computed.is_empty() {
            entry.student.summary = Some(computed.clone());
            tracing::debug!(id, "Cached student summary");
        }
        Ok(SummaryOutcome {
            summary: computed,
            cache_hit: false,
        })
    }
}
