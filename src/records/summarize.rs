//! Pluggable summary derivation for student records.
//!
//! The store treats summarization as an opaque, possibly failing step. [`ProfileSummarizer`]
//! is the default implementation and formats the profile fields into one sentence.

use super::types::{Student, SummaryError};
use async_trait::async_trait;

/// Interface implemented by summary providers.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Derive a human-readable synopsis of the student.
    async fn summarize(&self, student: &Student) -> Result<String, SummaryError>;
}

/// Deterministic summarizer that formats name, age, and email.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileSummarizer;

impl ProfileSummarizer {
    /// Construct the default summarizer.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Summarizer for ProfileSummarizer {
    async fn summarize(&self, student: &Student) -> Result<String, SummaryError> {
        Ok(format!(
            "Student {}, age {}, email {}",
            student.name, student.age, student.email
        ))
    }
}

/// Build the summarizer used by the default service wiring.
pub fn get_summarizer() -> Box<dyn Summarizer + Send + Sync> {
    Box::new(ProfileSummarizer::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn formats_profile_fields() {
        let student = Student {
            id: 1,
            name: "Ann".into(),
            age: 20,
            email: "a@x.com".into(),
            summary: None,
        };
        let summary = ProfileSummarizer::new()
            .summarize(&student)
            .await
            .expect("summary");
        assert_eq!(summary, "Student Ann, age 20, email a@x.com");
    }

    #[tokio::test]
    async fn accepts_empty_and_negative_fields() {
        let student = Student {
            id: 2,
            name: String::new(),
            age: -3,
            email: String::new(),
            summary: None,
        };
        let summary = get_summarizer().summarize(&student).await.expect("summary");
        assert_eq!(summary, "Student , age -3, email ");
    }
}
