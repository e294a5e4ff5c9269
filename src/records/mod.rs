//! Student records: the in-memory store, summary derivation, and the service facade.

mod service;
pub mod store;
pub mod summarize;
pub mod types;

pub use service::{RecordsApi, RecordsService};
pub use store::{StudentStore, SummaryOutcome};
pub use summarize::{ProfileSummarizer, Summarizer};
pub use types::{StoreError, Student, StudentId, StudentInput, SummaryError};
