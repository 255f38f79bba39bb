use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::ticket::{Comment, Ticket};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(base_url: Option<String>, email: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira base URL not configured".to_string()))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str, key: &str) -> String {
        format!("{}/rest/api/2/issue/{}", base_url.trim_end_matches('/'), key)
    }

    fn search_endpoint(base_url: &str) -> String {
        format!("{}/rest/api/2/search", base_url.trim_end_matches('/'))
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let (_, email, token) = self.api_details()?;
        debug!(%url, "calling Jira");

        let response = self
            .http
            .get(url)
            .query(query)
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to parse Jira response: {err}")))
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn fetch_issue(&self, key: &str) -> AppResult<Ticket> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::IssueTracker(
                "issue key must not be empty".to_string(),
            ));
        }

        let (base_url, _, _) = self.api_details()?;
        let payload: JiraIssueResponse = self
            .get_json(
                &Self::issue_endpoint(base_url, key),
                &[("expand", "comments".to_string())],
            )
            .await?;

        let url = Self::browse_url(base_url, &payload.key);
        Ok(payload.into_ticket(url))
    }

    async fn search_issues(&self, jql: &str, max_results: u32) -> AppResult<Vec<Ticket>> {
        let (base_url, _, _) = self.api_details()?;
        let page: JiraSearchResponse = self
            .get_json(
                &Self::search_endpoint(base_url),
                &[
                    ("jql", jql.to_string()),
                    ("maxResults", max_results.to_string()),
                    ("fields", "key".to_string()),
                ],
            )
            .await?;
        info!("JQL matched {} issue(s)", page.issues.len());

        let mut tickets = Vec::with_capacity(page.issues.len());
        for issue in page.issues {
            tickets.push(self.fetch_issue(&issue.key).await?);
        }
        Ok(tickets)
    }
}

#[derive(Deserialize)]
struct JiraIssueResponse {
    key: String,
    fields: JiraIssueFields,
}

impl JiraIssueResponse {
    fn into_ticket(self, url: String) -> Ticket {
        let fields = self.fields;
        let comments = fields
            .comment
            .map(|page| page.comments)
            .unwrap_or_default()
            .into_iter()
            .map(|comment| Comment {
                author: comment
                    .author
                    .map(|user| user.display_name)
                    .unwrap_or_else(|| "Unknown".to_string()),
                created: comment.created.unwrap_or_default(),
                body: comment.body.unwrap_or_default(),
            })
            .collect();

        Ticket {
            key: self.key,
            summary: fields.summary.unwrap_or_default(),
            issue_type: fields.issuetype.map(|named| named.name),
            status: fields.status.map(|named| named.name),
            priority: fields.priority.map(|named| named.name),
            assignee: fields.assignee.map(|user| user.display_name),
            reporter: fields.reporter.map(|user| user.display_name),
            created: fields.created,
            updated: fields.updated,
            description: fields.description,
            comments,
            url: Some(url),
        }
    }
}

#[derive(Deserialize)]
struct JiraIssueFields {
    summary: Option<String>,
    issuetype: Option<JiraNamed>,
    status: Option<JiraNamed>,
    priority: Option<JiraNamed>,
    assignee: Option<JiraUser>,
    reporter: Option<JiraUser>,
    created: Option<String>,
    updated: Option<String>,
    description: Option<String>,
    comment: Option<JiraCommentPage>,
}

#[derive(Deserialize)]
struct JiraNamed {
    name: String,
}

#[derive(Deserialize)]
struct JiraUser {
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Deserialize)]
struct JiraCommentPage {
    #[serde(default)]
    comments: Vec<JiraComment>,
}

#[derive(Deserialize)]
struct JiraComment {
    author: Option<JiraUser>,
    created: Option<String>,
    body: Option<String>,
}

#[derive(Deserialize)]
struct JiraSearchResponse {
    #[serde(default)]
    issues: Vec<JiraIssueKey>,
}

#[derive(Deserialize)]
struct JiraIssueKey {
    key: String,
}
