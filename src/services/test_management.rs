use async_trait::async_trait;

use crate::domain::test_case::{TestCase, TestExecution};
use crate::error::AppResult;

#[async_trait]
pub trait TestManagementService: Send + Sync {
    async fn load_test_case(&self, key: &str) -> AppResult<TestCase>;
    async fn load_issue_executions(&self, issue_key: &str) -> AppResult<Vec<TestExecution>>;
}
