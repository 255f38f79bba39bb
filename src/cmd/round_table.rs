use clap::Args;

use crate::context::AppContext;
use crate::domain::persona::ROUND_TABLE;
use crate::error::AppResult;
use crate::workflow::round_table::{
    DEFAULT_MAX_MESSAGES, DEFAULT_TOPIC, RoundTableSettings, TranscriptEntry, run_round_table,
};

#[derive(Args, Debug, Clone)]
pub struct RoundTableArgs {
    /// Discussion topic handed to the table as the opening message.
    #[arg(long, default_value = DEFAULT_TOPIC)]
    pub topic: String,
    /// Transcript length at which the discussion ends, topic included.
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGES)]
    pub max_messages: usize,
    /// Override the round table model.
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(ctx: &AppContext, args: RoundTableArgs) -> AppResult<()> {
    let settings = RoundTableSettings {
        topic: args.topic,
        max_messages: args.max_messages,
        ..RoundTableSettings::default()
    };

    println!("=== Round Table Discussion ===\n");
    println!("Topic: {}\n", settings.topic);
    println!("{}\n", "=".repeat(50));

    let transcript = run_round_table(ctx.language_model.as_ref(), &ROUND_TABLE, &settings).await?;
    print!("{}", render_transcript(&transcript));

    println!("{}", "=".repeat(50));
    println!("=== Discussion Complete ===");
    Ok(())
}

fn render_transcript(transcript: &[TranscriptEntry]) -> String {
    transcript
        .iter()
        .map(|entry| format!("{}: {}\n\n", entry.source, entry.content))
        .collect()
}
