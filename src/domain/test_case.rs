use crate::domain::document::Document;

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// A Zephyr Squad test case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    pub id: Option<String>,
    pub key: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub created_by: Option<String>,
    pub created_on: Option<String>,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub custom_fields: Vec<(String, String)>,
    pub project_key: Option<String>,
}

impl TestCase {
    /// `requested_key` stands in for the id when the payload carries none.
    pub fn to_document(&self, requested_key: &str) -> Document {
        let id = self.id.clone().unwrap_or_else(|| requested_key.to_string());
        let mut lines = vec![
            format!("Test Case ID: {id}"),
            format!("Key: {}", or_na(&self.key)),
            format!("Name: {}", or_na(&self.name)),
            format!("Status: {}", or_na(&self.status)),
            format!("Priority: {}", or_na(&self.priority)),
            format!("Created By: {}", or_na(&self.created_by)),
            format!("Created On: {}", or_na(&self.created_on)),
            String::new(),
        ];

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push("Description:".to_string());
            lines.push(description.to_string());
            lines.push(String::new());
        }

        if !self.labels.is_empty() {
            lines.push(format!("Labels: {}", self.labels.join(", ")));
            lines.push(String::new());
        }

        if !self.custom_fields.is_empty() {
            lines.push("Custom Fields:".to_string());
            for (name, value) in &self.custom_fields {
                lines.push(format!("  {name}: {value}"));
            }
            lines.push(String::new());
        }

        Document::new(lines.join("\n"))
            .with_meta("test_case_id", id)
            .with_meta("test_case_key", or_na(&self.key))
            .with_meta("name", or_na(&self.name))
            .with_meta("status", or_na(&self.status))
            .with_meta("priority", or_na(&self.priority))
            .with_meta("type", "zephyr_squad_test_case")
            .with_meta("project_key", or_na(&self.project_key))
    }
}

/// One execution of a test against an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestExecution {
    pub id: Option<String>,
    pub issue_key: Option<String>,
    pub test_case_key: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub executed_by: Option<String>,
    pub executed_on: Option<String>,
    pub cycle_name: Option<String>,
    pub version_name: Option<String>,
    pub comment: Option<String>,
}

impl TestExecution {
    pub fn to_document(&self, issue_key: &str) -> Document {
        let id = self.id.clone().unwrap_or_else(|| "None".to_string());
        let mut lines = vec![
            format!("Execution ID: {id}"),
            format!(
                "Issue Key: {}",
                self.issue_key.as_deref().unwrap_or(issue_key)
            ),
            format!("Test Case Key: {}", or_na(&self.test_case_key)),
            format!("Summary: {}", or_na(&self.summary)),
            format!("Status: {}", or_na(&self.status)),
            format!("Executed By: {}", or_na(&self.executed_by)),
            format!("Execution Date: {}", or_na(&self.executed_on)),
            format!("Cycle Name: {}", or_na(&self.cycle_name)),
            format!("Version: {}", or_na(&self.version_name)),
            String::new(),
        ];

        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            lines.push("Comment:".to_string());
            lines.push(comment.to_string());
            lines.push(String::new());
        }

        Document::new(lines.join("\n"))
            .with_meta("execution_id", id)
            .with_meta("issue_key", issue_key)
            .with_meta("test_case_key", or_na(&self.test_case_key))
            .with_meta("status", or_na(&self.status))
            .with_meta("type", "zephyr_squad_execution")
            .with_meta("cycle_name", or_na(&self.cycle_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_uses_requested_key_when_id_missing() {
        let doc = TestCase::default().to_document("WR-T12");
        assert!(doc.page_content.starts_with("Test Case ID: WR-T12\nKey: N/A\n"));
        assert!(doc.page_content.ends_with("Created On: N/A\n"));
        assert_eq!(doc.meta("type"), Some("zephyr_squad_test_case"));
    }

    #[test]
    fn test_case_optional_sections() {
        let case = TestCase {
            id: Some("101".to_string()),
            description: Some("Login with SSO".to_string()),
            labels: vec!["smoke".to_string(), "auth".to_string()],
            custom_fields: vec![("Component".to_string(), "Gateway".to_string())],
            ..TestCase::default()
        };
        let content = case.to_document("WR-T1").page_content;
        assert!(content.ends_with(
            "Created On: N/A\n\
             \n\
             Description:\n\
             Login with SSO\n\
             \n\
             Labels: smoke, auth\n\
             \n\
             Custom Fields:\n  Component: Gateway\n"
        ));
    }

    #[test]
    fn execution_defaults_issue_key_and_comment() {
        let execution = TestExecution {
            id: Some("9".to_string()),
            status: Some("PASS".to_string()),
            comment: Some("green on retry".to_string()),
            ..TestExecution::default()
        };
        let doc = execution.to_document("WR-4299");
        assert!(doc.page_content.contains("Issue Key: WR-4299\n"));
        assert!(doc.page_content.ends_with("\nComment:\ngreen on retry\n"));
        assert_eq!(doc.meta("execution_id"), Some("9"));
        assert_eq!(doc.meta("status"), Some("PASS"));
    }
}
