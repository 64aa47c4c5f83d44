use crate::config::JiraSettings;
use crate::domain::model::{CreatedIssue, IssueDraft, NewIssue, SubmissionOutcome};
use crate::domain::ports::IssueTracker;
use crate::utils::error::Result;
use tokio::sync::OnceCell;

/// Run-wide options applied to every submitted draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub epic_key: Option<String>,
    pub add_to_sprint: bool,
    /// Skips the board lookup when set.
    pub board_id: Option<u64>,
}

pub struct IssueSubmitter<T: IssueTracker> {
    tracker: T,
    project_key: String,
    issue_type: String,
    options: SubmitOptions,
    /// Active sprint, resolved on the first successful lookup.
    sprint_id: OnceCell<u64>,
}

impl<T: IssueTracker> IssueSubmitter<T> {
    pub fn new(tracker: T, settings: &JiraSettings, options: SubmitOptions) -> Self {
        Self {
            tracker,
            project_key: settings.project_key.clone(),
            issue_type: settings.issue_type.clone(),
            options,
            sprint_id: OnceCell::new(),
        }
    }

    pub fn new_issue(&self, draft: &IssueDraft) -> NewIssue {
        NewIssue {
            project_key: self.project_key.clone(),
            issue_type: self.issue_type.clone(),
            summary: draft.summary.clone(),
            description: draft.description.clone(),
            epic_key: self.options.epic_key.clone(),
        }
    }

    /// Creates the issue, then moves it into the active sprint if requested.
    ///
    /// Jira has no atomicity across these calls, so a failure after the
    /// create step yields `CreatedNoSprint` rather than `Failed`.
    pub async fn submit(&self, draft: &IssueDraft) -> SubmissionOutcome {
        let issue = match self.tracker.create_issue(&self.new_issue(draft)).await {
            Ok(issue) => issue,
            Err(error) => {
                tracing::warn!("Issue creation failed: {}", error);
                return SubmissionOutcome::Failed(error);
            }
        };
        tracing::info!("Created {}", issue.key);

        if !self.options.add_to_sprint {
            return SubmissionOutcome::Created(issue);
        }

        match self.assign_to_active_sprint(&issue).await {
            Ok(sprint_id) => {
                tracing::info!("Added {} to sprint {}", issue.key, sprint_id);
                SubmissionOutcome::Created(issue)
            }
            Err(error) => {
                tracing::warn!("{} was created but not added to the sprint: {}", issue.key, error);
                SubmissionOutcome::CreatedNoSprint { issue, error }
            }
        }
    }

    async fn assign_to_active_sprint(&self, issue: &CreatedIssue) -> Result<u64> {
        let sprint_id = *self
            .sprint_id
            .get_or_try_init(|| self.resolve_active_sprint())
            .await?;
        self.tracker.add_to_sprint(sprint_id, &issue.key).await?;
        Ok(sprint_id)
    }

    async fn resolve_active_sprint(&self) -> Result<u64> {
        let board_id = match self.options.board_id {
            Some(id) => id,
            None => self.tracker.find_board(&self.project_key).await?,
        };
        let sprint_id = self.tracker.active_sprint(board_id).await?;
        tracing::debug!("Active sprint on board {} is {}", board_id, sprint_id);
        Ok(sprint_id)
    }
}
