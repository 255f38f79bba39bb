use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::test_case::{TestCase, TestExecution};
use crate::error::{AppError, AppResult};
use crate::redact::{redact, truncate_chars};
use crate::services::TestManagementService;

pub const ZEPHYR_API_BASE: &str = "https://prod-api.zephyr4jiracloud.com/connect";

const ACCESS_KEY_HEADER: &str = "zapiAccessKey";
const ERROR_BODY_LIMIT: usize = 2000;

/// Zephyr Squad Cloud client. Authenticates with a `zapiAccessKey` token.
pub struct ZephyrClient {
    http: Client,
    api_base: String,
    token: Option<String>,
    debug_http: bool,
}

impl ZephyrClient {
    pub fn new(token: Option<String>, debug_http: bool) -> Self {
        Self {
            http: Client::new(),
            api_base: ZEPHYR_API_BASE.to_string(),
            token,
            debug_http,
        }
    }

    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Zephyr access token not configured".to_string()))
    }

    fn scrub(&self, text: &str) -> String {
        let secrets: Vec<&str> = self.token.as_deref().into_iter().collect();
        redact(text, &secrets)
    }

    fn execution_endpoints(&self, issue_key: &str) -> [String; 2] {
        [
            format!(
                "{}/public/rest/api/2.0/executions/search/issue/{issue_key}",
                self.api_base
            ),
            format!(
                "{}/public/rest/api/1.0/executions/search/issue/{issue_key}",
                self.api_base
            ),
        ]
    }

    fn get(&self, url: &str, token: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(ACCESS_KEY_HEADER, token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
    }
}

#[async_trait]
impl TestManagementService for ZephyrClient {
    async fn load_test_case(&self, key: &str) -> AppResult<TestCase> {
        let token = self.token()?;
        let url = format!("{}/public/rest/api/2.0/testcase/{key}", self.api_base);
        debug!(%url, "fetching Zephyr test case");

        let response = self
            .get(&url, token)
            .send()
            .await
            .map_err(|err| {
                AppError::TestManagement(self.scrub(&format!("failed to call Zephyr: {err}")))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TestManagement(format!(
                "Zephyr responded with {status}: {}",
                truncate_chars(&self.scrub(&body), ERROR_BODY_LIMIT)
            )));
        }

        let payload: Value = response.json().await.map_err(|err| {
            AppError::TestManagement(format!("failed to parse Zephyr response: {err}"))
        })?;
        Ok(test_case_from_json(&payload))
    }

    async fn load_issue_executions(&self, issue_key: &str) -> AppResult<Vec<TestExecution>> {
        let token = self.token()?;
        let mut last_error = String::new();
        let mut payload: Option<Value> = None;

        for url in self.execution_endpoints(issue_key) {
            info!("trying endpoint: {url}");
            let response = match self.get(&url, token).send().await {
                Ok(response) => response,
                Err(err) => {
                    last_error = self.scrub(&err.to_string());
                    warn!("error with endpoint: {last_error}");
                    continue;
                }
            };

            let status = response.status();
            info!("response status: {status}");
            if status == reqwest::StatusCode::OK {
                match response.json::<Value>().await {
                    Ok(value) => {
                        payload = Some(value);
                        break;
                    }
                    Err(err) => {
                        last_error = self.scrub(&err.to_string());
                        continue;
                    }
                }
            }

            let body = response.text().await.unwrap_or_default();
            let safe = truncate_chars(&self.scrub(&body), ERROR_BODY_LIMIT).to_string();
            if self.debug_http {
                info!("response text (redacted): {safe}");
            }
            last_error = safe;
        }

        let payload = payload.filter(has_content).ok_or_else(|| {
            AppError::TestManagement(format!(
                "Could not fetch data from any Zephyr endpoint. Last error: {last_error}"
            ))
        })?;

        let executions: Vec<TestExecution> = payload
            .get("searchResults")
            .and_then(Value::as_array)
            .map(|results| results.iter().map(execution_from_json).collect())
            .unwrap_or_default();
        info!("found {} execution(s)", executions.len());
        Ok(executions)
    }
}

/// `null`, `{}` and `[]` carry no executions and count as a failed fetch.
fn has_content(payload: &Value) -> bool {
    match payload {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Renders a scalar for display; `null` and missing values become `None`.
fn text(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}

fn test_case_from_json(payload: &Value) -> TestCase {
    let labels = payload
        .get("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| match label {
                    Value::String(value) => Some(value.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect()
        })
        .unwrap_or_default();

    let custom_fields = payload
        .get("customFields")
        .and_then(Value::as_object)
        .map(|fields: &Map<String, Value>| {
            fields
                .iter()
                .map(|(name, value)| {
                    let rendered = match value {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    (name.clone(), rendered)
                })
                .collect()
        })
        .unwrap_or_default();

    TestCase {
        id: text(payload, "id"),
        key: text(payload, "key"),
        name: text(payload, "name"),
        status: text(payload, "status"),
        priority: text(payload, "priority"),
        created_by: text(payload, "createdBy"),
        created_on: text(payload, "createdOn"),
        description: text(payload, "description"),
        labels,
        custom_fields,
        project_key: text(payload, "projectKey"),
    }
}

fn execution_from_json(entry: &Value) -> TestExecution {
    TestExecution {
        id: text(entry, "id"),
        issue_key: text(entry, "issueKey"),
        test_case_key: text(entry, "testCaseKey"),
        summary: text(entry, "summary"),
        status: text(entry, "executionStatus"),
        executed_by: text(entry, "executedBy"),
        executed_on: text(entry, "executedOn"),
        cycle_name: text(entry, "cycleName"),
        version_name: text(entry, "versionName"),
        comment: text(entry, "comment"),
    }
}
