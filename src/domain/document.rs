/// Formatted text block plus ordered metadata, ready to print or analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub page_content: String,
    pub metadata: Vec<(String, String)>,
}

impl Document {
    pub fn new(page_content: String) -> Self {
        Self {
            page_content,
            metadata: Vec::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.push((key.to_string(), value.into()));
        self
    }

    #[cfg(test)]
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Joins documents with a blank line, the way they are handed to the analyzer.
pub fn combine(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
