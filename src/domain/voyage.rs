use serde::Deserialize;
use similar::TextDiff;

pub const EVENTS: [&str; 4] = ["Storm at sea", "Crew mutiny", "Helpful nymph", "Monster attack"];

/// Minimum similarity for a model reply to count as a task name.
const MATCH_CUTOFF: f32 = 0.55;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VoyageTask {
    pub task: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Option<serde_json::Value>,
}

impl VoyageTask {
    pub fn difficulty_label(&self) -> String {
        match &self.difficulty {
            Some(serde_json::Value::String(value)) => value.clone(),
            Some(serde_json::Value::Null) | None => "?".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

pub fn summarize_tasks(tasks: &[VoyageTask]) -> String {
    tasks
        .iter()
        .map(|t| format!("{}: {}", t.task, t.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn describe_tasks(tasks: &[VoyageTask]) -> String {
    tasks
        .iter()
        .map(|t| {
            format!(
                "- {} (difficulty {}): {}",
                t.task,
                t.difficulty_label(),
                t.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strips bullets, numbering, quotes and emphasis from the first line of a
/// model reply.
pub fn normalize_choice(reply: &str) -> String {
    let first_line = reply.trim().lines().next().unwrap_or("");
    let mut candidate = first_line.trim();

    for prefix in ["- ", "* "] {
        if let Some(rest) = candidate.strip_prefix(prefix) {
            candidate = rest.trim();
        }
    }

    let head: String = candidate.chars().take(4).collect();
    if head.contains('.') {
        if let Some((left, right)) = candidate.split_once('.') {
            let left = left.trim();
            if !left.is_empty() && left.chars().all(|c| c.is_ascii_digit()) {
                candidate = right.trim();
            }
        }
    }

    candidate
        .trim_matches(|c| matches!(c, ' ' | '\t' | '"' | '\'' | '`' | '*'))
        .to_string()
}

/// Exact match, then the closest name above the cutoff, then the first name.
pub fn resolve_choice(reply: &str, names: &[&str]) -> Option<String> {
    let candidate = normalize_choice(reply);
    if let Some(exact) = names.iter().find(|name| **name == candidate) {
        return Some(exact.to_string());
    }

    let mut best: Option<(&str, f32)> = None;
    for &name in names {
        let score = TextDiff::from_chars(candidate.as_str(), name).ratio();
        if score >= MATCH_CUTOFF && best.is_none_or(|(_, top)| score > top) {
            best = Some((name, score));
        }
    }

    best.map(|(name, _)| name.to_string())
        .or_else(|| names.first().map(|name| name.to_string()))
}
