use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    #[error("CSV parse error: {message}")]
    Parse { message: String },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Jira rejected the credentials ({status}): {body}")]
    Auth { status: StatusCode, body: String },

    #[error("Jira responded with {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("No active sprint found on board {board_id}")]
    NoActiveSprint { board_id: u64 },

    #[error("Network error talking to Jira: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ImportError>;

impl From<toml::de::Error> for ImportError {
    fn from(err: toml::de::Error) -> Self {
        ImportError::Config {
            message: format!("TOML parsing error: {}", err),
        }
    }
}

impl ImportError {
    /// Short label used in per-row status lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::FileNotFound { .. } => "file-not-found",
            ImportError::Parse { .. } | ImportError::Csv(_) => "parse",
            ImportError::Auth { .. } => "auth",
            ImportError::Api { .. } | ImportError::NoActiveSprint { .. } => "api",
            ImportError::Network(_) => "network",
            ImportError::Io(_) => "io",
            ImportError::Serialization(_) => "serialization",
            ImportError::Config { .. } | ImportError::InvalidConfigValue { .. } => "config",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::FileNotFound { path } => format!("Cannot find the CSV file '{}'", path),
            ImportError::Parse { message } => format!("The CSV file is not usable: {}", message),
            ImportError::Csv(e) => format!("Failed to read a CSV record: {}", e),
            ImportError::Auth { status, .. } => {
                format!("Jira refused the request ({}); check your email and API token", status)
            }
            ImportError::Api { status, body } => format!("Jira returned {}: {}", status, body),
            ImportError::Network(e) if e.is_timeout() => "The request to Jira timed out".to_string(),
            ImportError::Network(_) => "Could not reach Jira".to_string(),
            ImportError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::FileNotFound { .. } => "Check the path passed as the first argument",
            ImportError::Parse { .. } | ImportError::Csv(_) => {
                "Make sure the first row holds the column names (Priority, Description of issue, ...)"
            }
            ImportError::Auth { .. } => "Set JIRA_EMAIL and JIRA_TOKEN to a valid Atlassian API token",
            ImportError::Api { .. } => "Inspect the response body; field ids may differ per project (try --list_fields)",
            ImportError::NoActiveSprint { .. } => "Start a sprint on the board or pass a different --board_id",
            ImportError::Network(_) => "Check JIRA_BASE_URL and your network connection",
            ImportError::Config { .. } | ImportError::InvalidConfigValue { .. } => {
                "Review the config file and JIRA_* environment variables"
            }
            ImportError::Io(_) | ImportError::Serialization(_) => "Re-run with --verbose for details",
        }
    }
}
