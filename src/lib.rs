pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{JiraClient, StdinConfirm};
pub use config::{CliConfig, JiraSettings};
pub use crate::core::{
    filter::PriorityFilter, loader::BugReportReader, pipeline::ImportPipeline, IssueSubmitter,
    SubmitOptions,
};
pub use utils::error::{ImportError, Result};
