use crate::config::JiraSettings;
use crate::domain::model::{CreateField, CreatedIssue, NewIssue};
use crate::domain::ports::IssueTracker;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ISSUES_API_ENDPOINT: &str = "/rest/api/2/issue";
const CREATE_META_V3_ENDPOINT: &str = "/rest/api/3/issue/createmeta";
const BOARD_ENDPOINT: &str = "/rest/agile/1.0/board";
const SPRINT_ENDPOINT: &str = "/rest/agile/1.0/sprint";

/// Jira Cloud REST client authenticated with an email + API token.
pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    token: String,
    epic_link_field: String,
}

impl JiraClient {
    pub fn new(settings: &JiraSettings) -> Result<Self> {
        let http = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            email: settings.email.clone(),
            token: settings.token.clone(),
            epic_link_field: settings.epic_link_field.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.email, Some(&self.token))
            .header(ACCEPT, "application/json")
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        tracing::debug!("Jira response status: {}", status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(classify_failure(status, body))
    }

    /// A 2xx whose body does not parse is an API error, not a network one:
    /// Jira may already have acted on the request.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Unexpected Jira response body ({}): {}", status, e);
            ImportError::Api { status, body }
        })
    }

    async fn issue_type_id(&self, project_key: &str, issue_type: &str) -> Result<String> {
        let url = self.url(&format!("{}/createmeta", ISSUES_API_ENDPOINT));
        let meta: CreateMetaResponse = self
            .fetch(self.http.get(url).query(&[("projectKeys", project_key)]))
            .await?;

        let project = meta
            .projects
            .into_iter()
            .find(|p| p.key == project_key)
            .ok_or_else(|| ImportError::Config {
                message: format!("project {} not found", project_key),
            })?;

        project
            .issuetypes
            .into_iter()
            .find(|t| t.name == issue_type)
            .map(|t| t.id)
            .ok_or_else(|| ImportError::Config {
                message: format!(
                    "issue type '{}' is not available in project {}",
                    issue_type, project_key
                ),
            })
    }
}

/// 401/403 mean the credentials were refused; everything else is an API error.
fn classify_failure(status: StatusCode, body: String) -> ImportError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ImportError::Auth { status, body },
        _ => ImportError::Api { status, body },
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        let body = CreateIssueRequest::new(issue, &self.epic_link_field);
        tracing::debug!("Create issue payload: {}", serde_json::to_string(&body)?);

        let created: CreateIssueResponse = self
            .fetch(self.http.post(self.url(ISSUES_API_ENDPOINT)).json(&body))
            .await?;

        Ok(CreatedIssue {
            url: self.browse_url(&created.key),
            key: created.key,
        })
    }

    async fn find_board(&self, project_key: &str) -> Result<u64> {
        let boards: Paged<Board> = self
            .fetch(
                self.http
                    .get(self.url(BOARD_ENDPOINT))
                    .query(&[("projectKeyOrId", project_key), ("type", "scrum")]),
            )
            .await?;

        match boards.values.as_slice() {
            [board] => Ok(board.id),
            others => {
                let names = others
                    .iter()
                    .map(|b| format!("{} ({})", b.name, b.id))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ImportError::Config {
                    message: format!(
                        "Found {} boards for {}: {}. Try setting the --board_id option directly",
                        others.len(),
                        project_key,
                        names
                    ),
                })
            }
        }
    }

    async fn active_sprint(&self, board_id: u64) -> Result<u64> {
        let url = self.url(&format!("{}/{}/sprint", BOARD_ENDPOINT, board_id));
        let sprints: Paged<Sprint> = self
            .fetch(self.http.get(url).query(&[("state", "active")]))
            .await?;

        sprints
            .values
            .first()
            .map(|s| s.id)
            .ok_or(ImportError::NoActiveSprint { board_id })
    }

    async fn add_to_sprint(&self, sprint_id: u64, issue_key: &str) -> Result<()> {
        let url = self.url(&format!("{}/{}/issue", SPRINT_ENDPOINT, sprint_id));
        let body = MoveIssuesRequest {
            issues: vec![issue_key],
        };
        // 204 No Content on success
        self.execute(self.http.post(url).json(&body)).await?;
        Ok(())
    }

    async fn create_fields(&self, project_key: &str, issue_type: &str) -> Result<Vec<CreateField>> {
        let type_id = self.issue_type_id(project_key, issue_type).await?;
        let url = self.url(&format!(
            "{}/{}/issuetypes/{}",
            CREATE_META_V3_ENDPOINT, project_key, type_id
        ));
        let meta: FieldMetaResponse = self.fetch(self.http.get(url)).await?;

        Ok(meta
            .fields
            .or(meta.values)
            .unwrap_or_default()
            .into_iter()
            .map(FieldMeta::into_create_field)
            .collect())
    }
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    fields: CreateIssueFields<'a>,
}

#[derive(Serialize)]
struct CreateIssueFields<'a> {
    project: KeyRef<'a>,
    issuetype: NameRef<'a>,
    summary: &'a str,
    description: &'a str,
    /// Instance-specific custom fields such as the epic link.
    #[serde(flatten)]
    custom: BTreeMap<&'a str, &'a str>,
}

impl<'a> CreateIssueRequest<'a> {
    fn new(issue: &'a NewIssue, epic_link_field: &'a str) -> Self {
        let mut custom = BTreeMap::new();
        if let Some(epic) = issue.epic_key.as_deref() {
            custom.insert(epic_link_field, epic);
        }
        Self {
            fields: CreateIssueFields {
                project: KeyRef {
                    key: &issue.project_key,
                },
                issuetype: NameRef {
                    name: &issue.issue_type,
                },
                summary: &issue.summary,
                description: &issue.description,
                custom,
            },
        }
    }
}

#[derive(Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct NameRef<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct MoveIssuesRequest<'a> {
    issues: Vec<&'a str>,
}

#[derive(Deserialize)]
struct CreateIssueResponse {
    key: String,
}

#[derive(Deserialize)]
struct Paged<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

#[derive(Deserialize)]
struct Board {
    id: u64,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct Sprint {
    id: u64,
}

#[derive(Deserialize)]
struct CreateMetaResponse {
    #[serde(default)]
    projects: Vec<ProjectMeta>,
}

#[derive(Deserialize)]
struct ProjectMeta {
    key: String,
    #[serde(default)]
    issuetypes: Vec<IssueTypeMeta>,
}

#[derive(Deserialize)]
struct IssueTypeMeta {
    id: String,
    name: String,
}

/// Older instances answer with `fields`, newer ones page them under `values`.
#[derive(Deserialize)]
struct FieldMetaResponse {
    fields: Option<Vec<FieldMeta>>,
    values: Option<Vec<FieldMeta>>,
}

#[derive(Deserialize)]
struct FieldMeta {
    name: String,
    key: Option<String>,
    #[serde(rename = "fieldId")]
    field_id: Option<String>,
    #[serde(default)]
    required: bool,
    schema: Option<FieldSchema>,
    #[serde(default)]
    operations: Vec<String>,
}

#[derive(Deserialize)]
struct FieldSchema {
    #[serde(rename = "type")]
    schema_type: String,
}

impl FieldMeta {
    fn into_create_field(self) -> CreateField {
        CreateField {
            name: self.name,
            key: self.key.or(self.field_id).unwrap_or_default(),
            required: self.required,
            schema_type: self.schema.map(|s| s.schema_type).unwrap_or_default(),
            operations: self.operations,
        }
    }
}
