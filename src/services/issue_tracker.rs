use async_trait::async_trait;

use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn fetch_issue(&self, key: &str) -> AppResult<Ticket>;
    async fn search_issues(&self, jql: &str, max_results: u32) -> AppResult<Vec<Ticket>>;
}
