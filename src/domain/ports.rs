use crate::domain::model::{CreateField, CreatedIssue, IssueDraft, NewIssue};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The slice of the Jira API the importer needs.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue>;

    /// Id of the single scrum board of a project.
    async fn find_board(&self, project_key: &str) -> Result<u64>;

    /// Id of the currently active sprint on a board.
    async fn active_sprint(&self, board_id: u64) -> Result<u64>;

    async fn add_to_sprint(&self, sprint_id: u64, issue_key: &str) -> Result<()>;

    async fn create_fields(&self, project_key: &str, issue_type: &str) -> Result<Vec<CreateField>>;
}

/// Asks the operator whether a draft should be submitted.
pub trait Confirm: Send + Sync {
    fn confirm(&self, line: usize, draft: &IssueDraft) -> Result<bool>;
}
