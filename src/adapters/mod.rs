// Adapters layer: concrete implementations of the domain ports.

pub mod jira;
pub mod prompt;

pub use jira::JiraClient;
pub use prompt::StdinConfirm;
