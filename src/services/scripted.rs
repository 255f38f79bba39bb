//! In-memory service implementations for workflow tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::test_case::{TestCase, TestExecution};
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::services::{
    ChatMessage, GenerationOptions, IssueTrackerService, LanguageModelService,
    TestManagementService,
};

/// Replays queued replies; once the queue is empty it answers `reply N`.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(Vec<ChatMessage>, GenerationOptions)>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, GenerationOptions)> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Content of the last message of every call, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|(messages, _)| messages.last().map(|m| m.content.clone()))
            .collect()
    }
}

#[async_trait]
impl LanguageModelService for ScriptedModel {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> AppResult<String> {
        let mut calls = self.calls.lock().expect("calls lock");
        calls.push((messages.to_vec(), *options));
        let count = calls.len();
        drop(calls);
        let next = self.replies.lock().expect("replies lock").pop_front();
        Ok(next.unwrap_or_else(|| format!("reply {count}")))
    }
}

#[derive(Default)]
pub struct StaticTracker {
    pub tickets: Vec<Ticket>,
    pub fetched: Mutex<Vec<String>>,
}

impl StaticTracker {
    pub fn with(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().expect("fetched lock").clone()
    }
}

#[async_trait]
impl IssueTrackerService for StaticTracker {
    async fn fetch_issue(&self, key: &str) -> AppResult<Ticket> {
        self.fetched.lock().expect("fetched lock").push(key.to_string());
        self.tickets
            .iter()
            .find(|ticket| ticket.key == key)
            .cloned()
            .ok_or_else(|| AppError::IssueTracker(format!("Jira responded with 404 for {key}")))
    }

    async fn search_issues(&self, _jql: &str, max_results: u32) -> AppResult<Vec<Ticket>> {
        Ok(self
            .tickets
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct StaticTestManagement {
    pub test_cases: Vec<TestCase>,
    pub executions: Vec<TestExecution>,
    pub unreachable: bool,
}

#[async_trait]
impl TestManagementService for StaticTestManagement {
    async fn load_test_case(&self, key: &str) -> AppResult<TestCase> {
        self.test_cases
            .iter()
            .find(|case| case.key.as_deref() == Some(key))
            .cloned()
            .ok_or_else(|| AppError::TestManagement(format!("no test case {key}")))
    }

    async fn load_issue_executions(&self, _issue_key: &str) -> AppResult<Vec<TestExecution>> {
        if self.unreachable {
            return Err(AppError::TestManagement(
                "Could not fetch data from any Zephyr endpoint".to_string(),
            ));
        }
        Ok(self.executions.clone())
    }
}

pub fn ticket(key: &str, summary: &str) -> Ticket {
    Ticket {
        key: key.to_string(),
        summary: summary.to_string(),
        issue_type: Some("Bug".to_string()),
        status: Some("Open".to_string()),
        priority: Some("High".to_string()),
        assignee: None,
        reporter: Some("Sam".to_string()),
        created: Some("2024-01-01".to_string()),
        updated: Some("2024-01-02".to_string()),
        description: Some(format!("Details for {key}")),
        comments: Vec::new(),
        url: Some(format!("https://jira.example/browse/{key}")),
    }
}
