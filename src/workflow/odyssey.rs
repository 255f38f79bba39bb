use std::fs;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::domain::voyage::{EVENTS, VoyageTask, describe_tasks, resolve_choice, summarize_tasks};
use crate::error::{AppError, AppResult};
use crate::services::{GenerationOptions, LanguageModelService};

pub const DEFAULT_TASKS_FILE: &str = "odysseus_tasks.json";

const CHOOSE_PROMPT: &str = "Odysseus is at a crossroads.

Pick the single NEXT task to do.

Rules:
- You MUST choose exactly one task name from the list below.
- Output ONLY the task name exactly as written (no numbering, no markdown, no quotes).

Task names:
{task_names}

Context (descriptions):
{tasks}
";

const EXPLAIN_PROMPT: &str = "Here is the sequence of tasks Odysseus completed:
{completed}

For each task, provide one short sentence explaining why it was done in this order.";

const EVENT_CHANCE: f64 = 0.5;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoyageEvent {
    pub after_task: String,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoyageReport {
    pub summary: String,
    pub completed: Vec<String>,
    pub events: Vec<VoyageEvent>,
    pub explanations: String,
}

pub fn load_tasks(path: &Path) -> AppResult<Vec<VoyageTask>> {
    let contents = fs::read_to_string(path).map_err(|err| {
        AppError::Configuration(format!("cannot read task file {}: {err}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|err| {
        AppError::Configuration(format!("invalid task file {}: {err}", path.display()))
    })
}

/// Lets the model order the tasks one pick at a time, then explain the order.
pub async fn run_voyage<R: Rng + ?Sized>(
    llm: &dyn LanguageModelService,
    tasks: Vec<VoyageTask>,
    rng: &mut R,
) -> AppResult<VoyageReport> {
    let options = GenerationOptions::with_temperature(TEMPERATURE);
    let summary = summarize_tasks(&tasks);
    let mut remaining = tasks;
    let mut completed = Vec::new();
    let mut events = Vec::new();

    while !remaining.is_empty() {
        let next = choose_next(llm, &remaining, &options).await?;
        info!("completing task: {next}");
        remaining.retain(|task| task.task != next);

        if rng.gen_bool(EVENT_CHANCE) {
            if let Some(event) = EVENTS.choose(rng) {
                info!("event occurs: {event}");
                events.push(VoyageEvent {
                    after_task: next.clone(),
                    event: event.to_string(),
                });
            }
        }
        completed.push(next);
    }

    let prompt = EXPLAIN_PROMPT.replace("{completed}", &completed.join(", "));
    let explanations = llm.complete(&prompt, &options).await?;

    Ok(VoyageReport {
        summary,
        completed,
        events,
        explanations,
    })
}

async fn choose_next(
    llm: &dyn LanguageModelService,
    remaining: &[VoyageTask],
    options: &GenerationOptions,
) -> AppResult<String> {
    let names: Vec<&str> = remaining
        .iter()
        .map(|task| task.task.as_str())
        .filter(|name| !name.is_empty())
        .collect();
    let listed = names
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = CHOOSE_PROMPT
        .replace("{task_names}", &listed)
        .replace("{tasks}", &describe_tasks(remaining));

    let reply = llm.complete(&prompt, options).await?;
    Ok(resolve_choice(&reply, &names)
        .unwrap_or_else(|| remaining[0].task.clone()))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::services::scripted::ScriptedModel;

    fn tasks() -> Vec<VoyageTask> {
        serde_json::from_str(
            r#"[
                {"task": "Escape the Cyclops", "description": "Blind Polyphemus", "difficulty": 4},
                {"task": "Visit Circe", "description": "Free the crew", "difficulty": 3},
                {"task": "Sail past the Sirens", "description": "Wax in the ears", "difficulty": "hard"}
            ]"#,
        )
        .expect("tasks")
    }

    #[tokio::test]
    async fn completes_every_task_in_model_order() {
        let model = ScriptedModel::new([
            "2. Visit Circe",
            "- sail past sirens",
            "**Escape the Cyclops**",
            "Because.",
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_voyage(&model, tasks(), &mut rng).await.expect("report");

        assert_eq!(
            report.completed,
            vec!["Visit Circe", "Sail past the Sirens", "Escape the Cyclops"]
        );
        assert_eq!(report.explanations, "Because.");
        assert!(report.summary.starts_with("Escape the Cyclops: Blind Polyphemus\n"));
        assert!(report.events.len() <= 3);
        assert!(report.events.iter().all(|e| EVENTS.contains(&e.event.as_str())));

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains("- Visit Circe (difficulty 3): Free the crew"));
        assert!(!prompts[1].contains("- Visit Circe\n"));
        assert!(prompts[3].contains("Visit Circe, Sail past the Sirens, Escape the Cyclops"));
    }

    #[tokio::test]
    async fn unusable_replies_still_make_progress() {
        let model = ScriptedModel::new(Vec::<String>::new());
        let mut rng = StdRng::seed_from_u64(1);
        let report = run_voyage(&model, tasks(), &mut rng).await.expect("report");
        assert_eq!(
            report.completed,
            vec!["Escape the Cyclops", "Visit Circe", "Sail past the Sirens"]
        );
    }

    #[tokio::test]
    async fn empty_task_list_goes_straight_to_explanation() {
        let model = ScriptedModel::new(["Nothing to explain."]);
        let mut rng = StdRng::seed_from_u64(3);
        let report = run_voyage(&model, Vec::new(), &mut rng).await.expect("report");
        assert!(report.completed.is_empty());
        assert_eq!(report.explanations, "Nothing to explain.");
    }

    #[test]
    fn reads_task_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_TASKS_FILE);
        fs::write(&path, r#"[{"task": "Return to Ithaca", "description": "Home"}]"#)
            .expect("write");
        let tasks = load_tasks(&path).expect("tasks");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Return to Ithaca");

        fs::write(&path, r#"[{"description": "no name"}]"#).expect("write");
        assert!(matches!(load_tasks(&path), Err(AppError::Configuration(_))));
    }
}
