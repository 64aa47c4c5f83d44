pub mod jira;

use crate::core::SubmitOptions;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::PathBuf;

pub use jira::JiraSettings;

pub const DEFAULT_PRIORITY: &str = "Stop ship";

/// Priority values used by the bug-bash spreadsheet template.
pub const KNOWN_PRIORITIES: [&str; 4] = [
    "Stop ship",
    "Ship before complete",
    "Design input needed",
    "Nice to have",
];

#[derive(Debug, Clone, Parser)]
#[command(name = "jira-bug-import")]
#[command(about = "Create Jira issues from a CSV of bug reports")]
pub struct CliConfig {
    /// CSV file containing bugs to create issues for
    #[arg(required_unless_present = "list_fields")]
    pub filename: Option<PathBuf>,

    /// Optional epic to link every created issue to (e.g. DW-67)
    #[arg(long)]
    pub epic: Option<String>,

    /// Add each created bug to the project's active sprint
    #[arg(long = "add_to_sprint")]
    pub add_to_sprint: bool,

    /// Numeric id of the sprint board. Only needed with --add_to_sprint when
    /// the project has more than one scrum board
    #[arg(long = "board_id")]
    pub board_id: Option<u64>,

    /// Priority to create tickets for (exact match)
    #[arg(long, default_value = DEFAULT_PRIORITY)]
    pub priority: String,

    /// List the fields settable when creating an issue in this project and exit
    #[arg(long = "list_fields")]
    pub list_fields: bool,

    /// Ask for confirmation before creating each issue
    #[arg(long)]
    pub confirm: bool,

    /// TOML file with a [jira] table; JIRA_* environment variables override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn submit_options(&self) -> SubmitOptions {
        SubmitOptions {
            epic_key: self.epic.clone(),
            add_to_sprint: self.add_to_sprint,
            board_id: self.board_id,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(epic) = &self.epic {
            validation::validate_issue_key("epic", epic)?;
        }
        validation::validate_not_empty("priority", &self.priority)?;
        if !KNOWN_PRIORITIES.contains(&self.priority.as_str()) {
            tracing::warn!(
                "Priority '{}' is not one of {:?}; rows are matched exactly",
                self.priority,
                KNOWN_PRIORITIES
            );
        }
        Ok(())
    }
}
