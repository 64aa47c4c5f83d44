use crate::domain::model::{CreateField, CreatedIssue, IssueDraft, NewIssue};
use crate::domain::ports::{Confirm, IssueTracker};
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(NewIssue),
    FindBoard(String),
    ActiveSprint(u64),
    AddToSprint(u64, String),
    CreateFields(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Create,
    FindBoard,
    ActiveSprint,
    AddToSprint,
}

/// In-memory tracker that records every call and hands out DW-1, DW-2, ...
#[derive(Clone, Default)]
pub struct RecordingTracker {
    calls: Arc<Mutex<Vec<Call>>>,
    failing: HashSet<Step>,
}

impl RecordingTracker {
    pub const BOARD_ID: u64 = 7;
    pub const SPRINT_ID: u64 = 99;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, step: Step) -> Self {
        self.failing.insert(step);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, step: Option<Step>) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match step {
            Some(step) if self.failing.contains(&step) => Err(ImportError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: format!("{step:?} failed"),
            }),
            _ => Ok(()),
        }
    }

    fn created_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, Call::Create(_)))
            .count()
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        self.record(Call::Create(issue.clone()), Some(Step::Create))?;
        let key = format!("{}-{}", issue.project_key, self.created_count());
        Ok(CreatedIssue {
            url: format!("https://example.atlassian.net/browse/{key}"),
            key,
        })
    }

    async fn find_board(&self, project_key: &str) -> Result<u64> {
        self.record(Call::FindBoard(project_key.to_string()), Some(Step::FindBoard))?;
        Ok(Self::BOARD_ID)
    }

    async fn active_sprint(&self, board_id: u64) -> Result<u64> {
        self.record(Call::ActiveSprint(board_id), Some(Step::ActiveSprint))?;
        Ok(Self::SPRINT_ID)
    }

    async fn add_to_sprint(&self, sprint_id: u64, issue_key: &str) -> Result<()> {
        self.record(
            Call::AddToSprint(sprint_id, issue_key.to_string()),
            Some(Step::AddToSprint),
        )
    }

    async fn create_fields(&self, project_key: &str, issue_type: &str) -> Result<Vec<CreateField>> {
        self.record(
            Call::CreateFields(project_key.to_string(), issue_type.to_string()),
            None,
        )?;
        Ok(vec![CreateField {
            name: "Summary".to_string(),
            key: "summary".to_string(),
            required: true,
            schema_type: "string".to_string(),
            operations: vec!["set".to_string()],
        }])
    }
}

/// Answers from a fixed script, one per prompt.
pub struct ScriptedConfirm {
    answers: Mutex<Vec<bool>>,
}

impl ScriptedConfirm {
    pub fn new(answers: &[bool]) -> Self {
        let mut answers = answers.to_vec();
        answers.reverse();
        Self {
            answers: Mutex::new(answers),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _line: usize, _draft: &IssueDraft) -> Result<bool> {
        Ok(self.answers.lock().unwrap().pop().unwrap_or(false))
    }
}
