use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PROJECT_KEY: &str = "DW";
pub const DEFAULT_ISSUE_TYPE: &str = "Bug";
pub const DEFAULT_EPIC_LINK_FIELD: &str = "customfield_10008";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection and project settings for the Jira instance.
///
/// Read from the `[jira]` table of an optional TOML file, then overridden by
/// `JIRA_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JiraSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_project_key")]
    pub project_key: String,
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
    /// Custom field holding the epic link. Differs between Jira instances.
    #[serde(default = "default_epic_link_field")]
    pub epic_link_field: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    jira: Option<JiraSettings>,
}

fn default_project_key() -> String {
    DEFAULT_PROJECT_KEY.to_string()
}

fn default_issue_type() -> String {
    DEFAULT_ISSUE_TYPE.to_string()
}

fn default_epic_link_field() -> String {
    DEFAULT_EPIC_LINK_FIELD.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for JiraSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: String::new(),
            token: String::new(),
            project_key: default_project_key(),
            issue_type: default_issue_type(),
            epic_link_field: default_epic_link_field(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl JiraSettings {
    /// Optional config file first, then environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut settings = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ImportError::Config {
            message: format!("cannot read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);
        let file: ConfigFile = toml::from_str(&processed_content)?;
        Ok(file.jira.unwrap_or_default())
    }

    /// Environment variables win over the config file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 5] = [
            ("JIRA_BASE_URL", &mut self.base_url),
            ("JIRA_EMAIL", &mut self.email),
            ("JIRA_TOKEN", &mut self.token),
            ("JIRA_PROJECT_KEY", &mut self.project_key),
            ("JIRA_ISSUE_TYPE", &mut self.issue_type),
        ];
        for (name, slot) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                tracing::debug!("Using {} from environment", name);
                *slot = value;
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for JiraSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("jira.base_url", &self.base_url)?;
        validation::validate_not_empty("jira.email", &self.email)?;
        validation::validate_not_empty("jira.token", &self.token)?;
        validation::validate_not_empty("jira.project_key", &self.project_key)?;
        validation::validate_not_empty("jira.issue_type", &self.issue_type)?;
        validation::validate_not_empty("jira.epic_link_field", &self.epic_link_field)?;
        validation::validate_positive_number("jira.timeout_seconds", self.timeout_seconds, 1)?;

        for (field, value) in [("jira.email", &self.email), ("jira.token", &self.token)] {
            if value.contains("${") {
                return Err(ImportError::InvalidConfigValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Environment variable placeholder was not resolved".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Replaces `${VAR}` with the environment value; unset variables are left as is.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
