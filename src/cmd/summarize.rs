use std::path::PathBuf;

use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::summarize::{SummaryMethod, summarize_pdf};

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    /// Path to the PDF file.
    pub pdf: PathBuf,
    /// `map_reduce` (default) or `refine`.
    #[arg(default_value = "map_reduce")]
    pub method: String,
    /// Override the summary model.
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(ctx: &AppContext, args: SummarizeArgs) -> AppResult<()> {
    let method: SummaryMethod = args.method.parse().unwrap_or_default();
    let outcome = summarize_pdf(ctx.language_model.as_ref(), &args.pdf, method).await?;

    println!("Loaded {} pages, {} chunks", outcome.pages, outcome.chunks);
    println!("\n{}", "=".repeat(80));
    println!("SUMMARY");
    println!("{}", "=".repeat(80));
    println!("{}", outcome.summary);
    println!("{}", "=".repeat(80));
    Ok(())
}
