pub mod jira;
pub mod ollama;
pub mod pdf;
pub mod zephyr;
