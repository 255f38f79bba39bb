pub mod issue_tracker;
pub mod language_model;
pub mod test_management;

#[cfg(test)]
pub mod scripted;

pub use issue_tracker::IssueTrackerService;
pub use language_model::{ChatMessage, GenerationOptions, LanguageModelService, Role};
pub use test_management::TestManagementService;
