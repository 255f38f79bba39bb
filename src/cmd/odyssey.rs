use std::path::PathBuf;

use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::odyssey::{DEFAULT_TASKS_FILE, VoyageReport, load_tasks, run_voyage};

#[derive(Args, Debug, Clone)]
pub struct OdysseyArgs {
    /// JSON file holding the task list.
    #[arg(long, default_value = DEFAULT_TASKS_FILE)]
    pub tasks: PathBuf,
    /// Seed for the random events, for repeatable runs.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the odyssey model.
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(ctx: &AppContext, args: OdysseyArgs) -> AppResult<()> {
    let tasks = load_tasks(&args.tasks)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = run_voyage(ctx.language_model.as_ref(), tasks, &mut rng).await?;
    print!("{}", render_report(&report));
    Ok(())
}

fn render_report(report: &VoyageReport) -> String {
    let mut out = format!("TASKS SUMMARY\n{}\n\n", report.summary);

    out.push_str("COMPLETED TASKS\n");
    for (index, task) in report.completed.iter().enumerate() {
        out.push_str(&format!("{}. {task}\n", index + 1));
        for event in report.events.iter().filter(|e| &e.after_task == task) {
            out.push_str(&format!("   Event: {}\n", event.event));
        }
    }

    out.push_str(&format!("\nEXPLANATIONS\n{}\n", report.explanations));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::odyssey::VoyageEvent;

    #[test]
    fn events_follow_the_task_they_interrupted() {
        let report = VoyageReport {
            summary: "Visit Circe: Free the crew".to_string(),
            completed: vec!["Visit Circe".to_string(), "Return home".to_string()],
            events: vec![VoyageEvent {
                after_task: "Visit Circe".to_string(),
                event: "Storm at sea".to_string(),
            }],
            explanations: "Circe first.".to_string(),
        };
        let rendered = render_report(&report);
        assert!(rendered.contains("1. Visit Circe\n   Event: Storm at sea\n2. Return home\n"));
        assert!(rendered.ends_with("EXPLANATIONS\nCirce first.\n"));
    }
}
