use crate::config::file_config::ServerConfig;
use crate::domain::model::{Board, BoardPage, Issue, Sprint, SprintIssuesPage, SprintSnapshot};
use crate::utils::error::{ReportError, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const AGILE_API: &str = "rest/agile/1.0";
const CORE_API: &str = "rest/api/2";

/// Read-only client for the Jira agile and core REST APIs, using basic auth.
pub struct JiraClient {
    base_url: Url,
    username: String,
    password: String,
    client: Client,
}

impl JiraClient {
    pub fn new(server: &ServerConfig) -> Result<Self> {
        let mut base_url =
            Url::parse(&server.url).map_err(|e| ReportError::InvalidConfigValueError {
                field: "server.url".to_string(),
                value: server.url.clone(),
                reason: format!("Invalid URL format: {}", e),
            })?;
        // Keep any context path (https://host/jira) when joining API paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(server.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url,
            username: server.username.clone(),
            password: server.password.clone(),
            client,
        })
    }

    pub async fn sprint(&self, sprint_id: u64) -> Result<Sprint> {
        let url = self.endpoint(&format!("{}/sprint/{}", AGILE_API, sprint_id))?;
        let sprint: Sprint = self.get_json(url, &[]).await?;
        tracing::debug!("Loaded sprint {} ({})", sprint.id, sprint.name);
        Ok(sprint)
    }

    /// All issues of a sprint, following `startAt` until `total` is reached.
    pub async fn sprint_issues(&self, sprint_id: u64, page_size: usize) -> Result<Vec<Issue>> {
        let url = self.endpoint(&format!("{}/sprint/{}/issue", AGILE_API, sprint_id))?;
        let mut issues: Vec<Issue> = Vec::new();

        loop {
            let query = [
                ("startAt", issues.len().to_string()),
                ("maxResults", page_size.to_string()),
            ];
            let body = self.get_body(url.clone(), &query).await?;
            if body.trim().is_empty() {
                tracing::warn!("Empty page from Jira at startAt={}, stopping", issues.len());
                break;
            }

            let page: SprintIssuesPage = serde_json::from_str(&body)?;
            let received = page.issues.len();
            for mut issue in page.issues {
                issue.hydrate()?;
                issues.push(issue);
            }
            tracing::debug!(
                "Fetched {} issues (startAt={}, {}/{})",
                received,
                page.start_at,
                issues.len(),
                page.total
            );

            if received == 0 || issues.len() >= page.total {
                break;
            }
        }

        Ok(issues)
    }

    /// Sprint detail plus all of its issues.
    pub async fn snapshot(&self, sprint_id: u64, page_size: usize) -> Result<SprintSnapshot> {
        let sprint = self.sprint(sprint_id).await?;
        let issues = self.sprint_issues(sprint_id, page_size).await?;
        tracing::info!("Loaded {} issues from sprint '{}'", issues.len(), sprint.name);
        Ok(SprintSnapshot { sprint, issues })
    }

    pub async fn issue(&self, issue_key: &str) -> Result<Issue> {
        if matches!(issue_key.trim(), "" | "." | "..") {
            return Err(ReportError::InvalidConfigValueError {
                field: "issue key".to_string(),
                value: issue_key.to_string(),
                reason: "not an issue key".to_string(),
            });
        }
        let mut url = self.endpoint(&format!("{}/issue", CORE_API))?;
        // The key is one path segment; `?`, `#` and `/` are encoded, not interpreted.
        url.path_segments_mut()
            .map_err(|_| ReportError::ProcessingError {
                message: format!("cannot build Jira URL for issue '{}'", issue_key),
            })?
            .push(issue_key);
        let mut issue: Issue = self.get_json(url, &[]).await?;
        issue.hydrate()?;
        Ok(issue)
    }

    pub async fn boards(&self, page_size: usize) -> Result<Vec<Board>> {
        let url = self.endpoint(&format!("{}/board", AGILE_API))?;
        let mut boards: Vec<Board> = Vec::new();

        loop {
            let query = [
                ("startAt", boards.len().to_string()),
                ("maxResults", page_size.to_string()),
            ];
            let page: BoardPage = self.get_json(url.clone(), &query).await?;
            let received = page.values.len();
            boards.extend(page.values);

            if page.is_last || received == 0 {
                break;
            }
        }

        Ok(boards)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ReportError::ProcessingError {
                message: format!("cannot build Jira URL for '{}': {}", path, e),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let body = self.get_body(url, query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_body(&self, url: Url, query: &[(&str, String)]) -> Result<String> {
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Jira response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::JiraStatusError {
                status: status.as_u16(),
                url: url.to_string(),
                reason: error_reason(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string()),
            });
        }

        Ok(response.text().await?)
    }
}

/// Jira error bodies look like `{"errorMessages": ["..."], "errors": {}}`.
fn error_reason(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let messages: Vec<&str> = value
        .get("errorMessages")?
        .as_array()?
        .iter()
        .filter_map(|m| m.as_str())
        .collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}
