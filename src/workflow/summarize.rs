use std::path::Path;
use std::str::FromStr;

use tracing::{info, warn};

use crate::domain::chunk::{Chunk, Page, TextSplitter};
use crate::error::{AppError, AppResult};
use crate::infra::pdf;
use crate::services::{GenerationOptions, LanguageModelService};

const MAP_PROMPT: &str = "Write a concise summary of the following:


\"{text}\"


CONCISE SUMMARY:";

const QUESTION_PROMPT: &str = "Write a concise summary of the following:

{text}

CONCISE SUMMARY:";

const REFINE_PROMPT: &str = "Your job is to produce a final summary.
We have provided an existing summary up to a certain point: {existing_answer}
We have the opportunity to refine the existing summary (only if needed) with some more context below.
------------
{text}
------------
Given the new context, refine the original summary. If the context isn't useful, return the original summary.
REFINED SUMMARY:";

/// Budget for the text handed to a single combine call.
const COMBINE_TOKEN_BUDGET: usize = 3000;
const CHARS_PER_TOKEN: usize = 4;
const MAX_COLLAPSE_ROUNDS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryMethod {
    #[default]
    MapReduce,
    Refine,
}

impl SummaryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMethod::MapReduce => "map_reduce",
            SummaryMethod::Refine => "refine",
        }
    }
}

impl FromStr for SummaryMethod {
    type Err = std::convert::Infallible;

    /// Anything other than `refine` selects map-reduce.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("refine") {
            Ok(SummaryMethod::Refine)
        } else {
            Ok(SummaryMethod::MapReduce)
        }
    }
}

pub struct SummaryOutcome {
    pub pages: usize,
    pub chunks: usize,
    pub summary: String,
}

pub async fn summarize_pdf(
    llm: &dyn LanguageModelService,
    path: &Path,
    method: SummaryMethod,
) -> AppResult<SummaryOutcome> {
    let pages = pdf::load_pages(path)?;
    summarize_pages(llm, &pages, &TextSplitter::default(), method).await
}

pub async fn summarize_pages(
    llm: &dyn LanguageModelService,
    pages: &[Page],
    splitter: &TextSplitter,
    method: SummaryMethod,
) -> AppResult<SummaryOutcome> {
    let chunks = splitter.split_pages(pages);
    info!(
        "split into {} chunks of up to {} characters",
        chunks.len(),
        splitter.chunk_size()
    );
    if chunks.is_empty() {
        return Err(AppError::Document(
            "document has no extractable text".to_string(),
        ));
    }

    info!(method = method.as_str(), model = llm.model(), "generating summary");
    let summary = match method {
        SummaryMethod::MapReduce => map_reduce(llm, &chunks).await?,
        SummaryMethod::Refine => refine(llm, &chunks).await?,
    };

    Ok(SummaryOutcome {
        pages: pages.len(),
        chunks: chunks.len(),
        summary,
    })
}

fn deterministic() -> GenerationOptions {
    GenerationOptions::with_temperature(0.0)
}

fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

async fn summarize_text(llm: &dyn LanguageModelService, text: &str) -> AppResult<String> {
    llm.complete(&MAP_PROMPT.replace("{text}", text), &deterministic())
        .await
}

/// Summarizes every chunk on its own, then combines the partial summaries,
/// collapsing them in budget-sized groups while they are too long.
async fn map_reduce(llm: &dyn LanguageModelService, chunks: &[Chunk]) -> AppResult<String> {
    let mut partials = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        info!("summarizing chunk {} (page {})", chunk.index + 1, chunk.page);
        partials.push(summarize_text(llm, &chunk.text).await?);
    }

    let mut rounds = 0;
    while total_tokens(&partials) > COMBINE_TOKEN_BUDGET && partials.len() > 1 {
        if rounds == MAX_COLLAPSE_ROUNDS {
            warn!("partial summaries still exceed the combine budget after {rounds} rounds");
            break;
        }
        rounds += 1;
        let groups = group_within_budget(&partials, COMBINE_TOKEN_BUDGET);
        info!("collapsing {} partial summaries into {}", partials.len(), groups.len());
        let mut collapsed = Vec::with_capacity(groups.len());
        for group in groups {
            collapsed.push(summarize_text(llm, &group.join("\n\n")).await?);
        }
        partials = collapsed;
    }

    summarize_text(llm, &partials.join("\n\n")).await
}

fn total_tokens(texts: &[String]) -> usize {
    texts.iter().map(|text| estimate_tokens(text)).sum()
}

/// Consecutive groups whose estimated size stays within `budget`; a single
/// oversized text forms its own group.
fn group_within_budget(texts: &[String], budget: usize) -> Vec<Vec<&str>> {
    let mut groups = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut size = 0;
    for text in texts {
        let tokens = estimate_tokens(text);
        if !current.is_empty() && size + tokens > budget {
            groups.push(std::mem::take(&mut current));
            size = 0;
        }
        current.push(text);
        size += tokens;
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

async fn refine(llm: &dyn LanguageModelService, chunks: &[Chunk]) -> AppResult<String> {
    let (first, rest) = chunks
        .split_first()
        .ok_or_else(|| AppError::Document("nothing to summarize".to_string()))?;

    let mut summary = llm
        .complete(&QUESTION_PROMPT.replace("{text}", &first.text), &deterministic())
        .await?;

    for chunk in rest {
        info!("refining with chunk {} (page {})", chunk.index + 1, chunk.page);
        let prompt = REFINE_PROMPT
            .replace("{existing_answer}", &summary)
            .replace("{text}", &chunk.text);
        summary = llm.complete(&prompt, &deterministic()).await?;
    }
    Ok(summary)
}
