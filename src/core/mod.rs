pub mod description;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod submitter;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{CsvRow, ImportSummary, IssueDraft, RowReport, SubmissionOutcome};
pub use crate::domain::ports::{Confirm, IssueTracker};
pub use crate::utils::error::Result;
pub use submitter::{IssueSubmitter, SubmitOptions};
