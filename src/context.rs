use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, LanguageModelService, TestManagementService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub test_management: Arc<dyn TestManagementService>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        test_management: Arc<dyn TestManagementService>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            test_management,
            language_model,
        }
    }
}
