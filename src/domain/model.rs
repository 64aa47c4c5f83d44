use crate::utils::error::ImportError;
use std::collections::HashMap;

pub const COL_PRIORITY: &str = "Priority";
pub const COL_DESCRIPTION: &str = "Description of issue";
pub const COL_NOTES: &str = "Additional notes";
pub const COL_PLATFORM: &str = "Platform/URL";
pub const COL_TITLE: &str = "Title";

/// Columns the loader refuses to run without.
pub const REQUIRED_COLUMNS: [&str; 2] = [COL_PRIORITY, COL_DESCRIPTION];

/// One data line of the bug report CSV, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    /// 1-based data line number (the header is line 0).
    pub line: usize,
    pub fields: HashMap<String, String>,
}

impl CsvRow {
    pub fn new(line: usize, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Missing columns read as empty.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn priority(&self) -> &str {
        self.get(COL_PRIORITY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub summary: String,
    pub description: String,
}

/// Everything needed for a single create-issue call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project_key: String,
    pub issue_type: String,
    pub summary: String,
    pub description: String,
    pub epic_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub key: String,
    pub url: String,
}

/// A field that can be set on the create screen of an issue type.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateField {
    pub name: String,
    pub key: String,
    pub required: bool,
    pub schema_type: String,
    pub operations: Vec<String>,
}

/// Result of pushing one draft through create → (sprint lookup → assign).
#[derive(Debug)]
pub enum SubmissionOutcome {
    Created(CreatedIssue),
    /// The issue exists in Jira but is not in the sprint.
    CreatedNoSprint {
        issue: CreatedIssue,
        error: ImportError,
    },
    Failed(ImportError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Created(_))
    }

    pub fn issue(&self) -> Option<&CreatedIssue> {
        match self {
            SubmissionOutcome::Created(issue) | SubmissionOutcome::CreatedNoSprint { issue, .. } => {
                Some(issue)
            }
            SubmissionOutcome::Failed(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum RowOutcome {
    /// Priority did not match the filter.
    Filtered,
    /// Eligible, but the operator answered no.
    Declined,
    Submitted(SubmissionOutcome),
}

impl RowOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RowOutcome::Filtered => "filtered",
            RowOutcome::Declined => "declined",
            RowOutcome::Submitted(SubmissionOutcome::Created(_)) => "created",
            RowOutcome::Submitted(SubmissionOutcome::CreatedNoSprint { .. }) => "created-no-sprint",
            RowOutcome::Submitted(SubmissionOutcome::Failed(_)) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct RowReport {
    pub line: usize,
    pub summary: String,
    pub outcome: RowOutcome,
}

impl RowReport {
    /// Human-readable status line, or `None` for filtered rows.
    pub fn status_line(&self) -> Option<String> {
        let text = match &self.outcome {
            RowOutcome::Filtered => return None,
            RowOutcome::Declined => format!("⏭️  line {}: skipped \"{}\"", self.line, self.summary),
            RowOutcome::Submitted(SubmissionOutcome::Created(issue)) => {
                format!("✅ line {}: created {} {}", self.line, issue.key, issue.url)
            }
            RowOutcome::Submitted(SubmissionOutcome::CreatedNoSprint { issue, error }) => format!(
                "⚠️  line {}: created {} {} but NOT added to sprint [{}] {}",
                self.line,
                issue.key,
                issue.url,
                error.kind(),
                error.user_friendly_message()
            ),
            RowOutcome::Submitted(SubmissionOutcome::Failed(error)) => format!(
                "❌ line {}: failed \"{}\" [{}] {}",
                self.line,
                self.summary,
                error.kind(),
                error.user_friendly_message()
            ),
        };
        Some(text)
    }
}

/// Run totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub read: usize,
    pub eligible: usize,
    pub created: usize,
    pub created_no_sprint: usize,
    pub failed: usize,
    pub declined: usize,
}

impl ImportSummary {
    pub fn record(&mut self, report: &RowReport) {
        self.read += 1;
        match &report.outcome {
            RowOutcome::Filtered => {}
            RowOutcome::Declined => {
                self.eligible += 1;
                self.declined += 1;
            }
            RowOutcome::Submitted(outcome) => {
                self.eligible += 1;
                match outcome {
                    SubmissionOutcome::Created(_) => self.created += 1,
                    SubmissionOutcome::CreatedNoSprint { .. } => self.created_no_sprint += 1,
                    SubmissionOutcome::Failed(_) => self.failed += 1,
                }
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed + self.created_no_sprint > 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows read, {} eligible: {} created, {} created without sprint, {} failed, {} skipped",
            self.read,
            self.eligible,
            self.created,
            self.created_no_sprint,
            self.failed,
            self.declined
        )
    }
}
