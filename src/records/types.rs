//! Core data types and error definitions for student records.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier assigned to a student by the store.
pub type StudentId = i64;

/// A stored student profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Identifier assigned at creation; never changes.
    pub id: StudentId,
    /// Display name, stored verbatim.
    pub name: String,
    /// Age, stored verbatim (negative values are accepted).
    pub age: i64,
    /// Contact email, stored verbatim.
    pub email: String,
    /// Cached profile summary, absent until first computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Caller-supplied fields for create and update.
///
/// Every field defaults to its zero value when missing or `null`, and unknown fields (including
/// `id`) are ignored, so `{}` decodes to an empty student. Capitalized keys (`"Name"`) are
/// accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentInput {
    /// Display name.
    #[serde(alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    /// Age in years.
    #[serde(alias = "Age", deserialize_with = "null_as_default")]
    pub age: i64,
    /// Contact email.
    #[serde(alias = "Email", deserialize_with = "null_as_default")]
    pub email: String,
    /// Explicit summary to store. An empty string counts as no summary.
    #[serde(alias = "Summary")]
    pub summary: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl StudentInput {
    /// Materialize the input as a student carrying the given id.
    pub(crate) fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
            summary: self.summary.filter(|summary| !summary.is_empty()),
        }
    }
}

/// Errors raised by summarizers.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The summarizer could not derive a summary for the record.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
}

/// Errors emitted by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No student with the requested id exists.
    #[error("Student not found: {0}")]
    NotFound(StudentId),
    /// The summarizer failed; nothing was cached.
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_defaults_missing_fields() {
        let input: StudentInput = serde_json::from_value(json!({ "name": "Ann" })).expect("decode");
        assert_eq!(input.name, "Ann");
        assert_eq!(input.age, 0);
        assert_eq!(input.email, "");
        assert_eq!(input.summary, None);
    }

    #[test]
    fn input_ignores_id_field() {
        let input: StudentInput =
            serde_json::from_value(json!({ "id": 99, "name": "Bo", "age": 30 })).expect("decode");
        let student = input.into_student(4);
        assert_eq!(student.id, 4);
        assert_eq!(student.name, "Bo");
    }

    #[test]
    fn null_fields_fall_back_to_zero_values() {
        let input: StudentInput = serde_json::from_value(json!({
            "name": null,
            "age": null,
            "email": "a@x.com",
            "summary": null
        }))
        .expect("decode");
        assert_eq!(input.name, "");
        assert_eq!(input.age, 0);
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.summary, None);
    }

    #[test]
    fn capitalized_keys_are_accepted() {
        let input: StudentInput =
            serde_json::from_value(json!({ "Name": "Bo", "Age": 31, "Email": "b@x.com" }))
                .expect("decode");
        assert_eq!(input.name, "Bo");
        assert_eq!(input.age, 31);
        assert_eq!(input.email, "b@x.com");
    }

    #[test]
    fn wrong_types_are_still_rejected() {
        let result = serde_json::from_value::<StudentInput>(json!({ "age": "twenty" }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_summary_is_treated_as_absent() {
        let input = StudentInput {
            summary: Some(String::new()),
            ..StudentInput::default()
        };
        assert_eq!(input.into_student(1).summary, None);
    }

    #[test]
    fn student_omits_missing_summary_on_the_wire() {
        let student = StudentInput {
            name: "Ann".into(),
            age: 20,
            email: "a@x.com".into(),
            summary: None,
        }
        .into_student(1);
        let value = serde_json::to_value(&student).expect("encode");
        assert_eq!(
            value,
            json!({ "id": 1, "name": "Ann", "age": 20, "email": "a@x.com" })
        );
    }
}
