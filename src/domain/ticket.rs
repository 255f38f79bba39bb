use crate::domain::document::Document;

const NOT_AVAILABLE: &str = "N/A";
const NO_PRIORITY: &str = "None";
const UNASSIGNED: &str = "Unassigned";
const UNKNOWN_REPORTER: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub created: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub description: Option<String>,
    pub comments: Vec<Comment>,
    pub url: Option<String>,
}

impl Ticket {
    pub fn priority_label(&self) -> &str {
        self.priority.as_deref().unwrap_or(NO_PRIORITY)
    }

    pub fn assignee_label(&self) -> &str {
        self.assignee.as_deref().unwrap_or(UNASSIGNED)
    }

    pub fn reporter_label(&self) -> &str {
        self.reporter.as_deref().unwrap_or(UNKNOWN_REPORTER)
    }

    pub fn to_document(&self) -> Document {
        let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.into());
        let description = self
            .description
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_DESCRIPTION);

        let mut lines = vec![
            format!("Issue: {}", self.key),
            format!("Summary: {}", self.summary),
            format!("Type: {}", or_na(&self.issue_type)),
            format!("Status: {}", or_na(&self.status)),
            format!("Priority: {}", self.priority_label()),
            format!("Assignee: {}", self.assignee_label()),
            format!("Reporter: {}", self.reporter_label()),
            format!("Created: {}", or_na(&self.created)),
            format!("Updated: {}", or_na(&self.updated)),
            String::new(),
            "Description:".to_string(),
            description.to_string(),
        ];

        if !self.comments.is_empty() {
            lines.push(String::new());
            lines.push("Comments:".to_string());
            for comment in &self.comments {
                lines.push(format!("\n[{} - {}]", comment.author, comment.created));
                lines.push(comment.body.clone());
            }
        }

        Document::new(lines.join("\n"))
            .with_meta("issue_key", self.key.as_str())
            .with_meta("summary", self.summary.as_str())
            .with_meta("type", or_na(&self.issue_type))
            .with_meta("status", or_na(&self.status))
            .with_meta("priority", self.priority_label())
            .with_meta("assignee", self.assignee_label())
            .with_meta("reporter", self.reporter_label())
            .with_meta("created", or_na(&self.created))
            .with_meta("updated", or_na(&self.updated))
            .with_meta("url", or_na(&self.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_ticket() -> Ticket {
        Ticket {
            key: "OPS-7".to_string(),
            summary: "Rotate certificates".to_string(),
            issue_type: None,
            status: None,
            priority: None,
            assignee: None,
            reporter: None,
            created: None,
            updated: None,
            description: None,
            comments: Vec::new(),
            url: None,
        }
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let doc = bare_ticket().to_document();
        assert_eq!(
            doc.page_content,
            "Issue: OPS-7\n\
             Summary: Rotate certificates\n\
             Type: N/A\n\
             Status: N/A\n\
             Priority: None\n\
             Assignee: Unassigned\n\
             Reporter: Unknown\n\
             Created: N/A\n\
             Updated: N/A\n\
             \n\
             Description:\n\
             No description provided"
        );
        assert_eq!(doc.meta("assignee"), Some("Unassigned"));
        assert_eq!(doc.meta("url"), Some("N/A"));
    }

    #[test]
    fn empty_description_counts_as_missing() {
        let mut ticket = bare_ticket();
        ticket.description = Some(String::new());
        assert!(
            ticket
                .to_document()
                .page_content
                .ends_with("Description:\nNo description provided")
        );
    }

    #[test]
    fn comments_follow_description() {
        let mut ticket = bare_ticket();
        ticket.description = Some("Certs expire Friday.".to_string());
        ticket.comments = vec![
            Comment {
                author: "Dana".to_string(),
                created: "2024-05-01T10:00:00.000+0000".to_string(),
                body: "On it.".to_string(),
            },
            Comment {
                author: "Lee".to_string(),
                created: "2024-05-02T09:30:00.000+0000".to_string(),
                body: "Done for staging.".to_string(),
            },
        ];
        let content = ticket.to_document().page_content;
        assert!(content.ends_with(
            "Certs expire Friday.\n\
             \n\
             Comments:\n\
             \n[Dana - 2024-05-01T10:00:00.000+0000]\n\
             On it.\n\
             \n[Lee - 2024-05-02T09:30:00.000+0000]\n\
             Done for staging."
        ));
    }

    #[test]
    fn metadata_order_is_fixed() {
        let doc = bare_ticket().to_document();
        let keys: Vec<_> = doc.metadata.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "issue_key", "summary", "type", "status", "priority", "assignee", "reporter",
                "created", "updated", "url"
            ]
        );
    }
}
