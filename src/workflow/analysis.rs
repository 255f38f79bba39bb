use tracing::info;

use crate::error::AppResult;
use crate::services::{GenerationOptions, LanguageModelService};

const SUMMARY_PROMPT: &str = "You are a technical project manager analyzing a Jira ticket.
Provide a concise summary of the following ticket, highlighting:
1. The main issue or request
2. Current status and priority
3. Key details from description and comments

Ticket Information:
{ticket_text}

Summary:";

const ACTION_ITEMS_PROMPT: &str = "You are a technical project manager analyzing a Jira ticket.
Extract all action items, tasks, or next steps mentioned in the ticket.
Format them as a numbered list.

Ticket Information:
{ticket_text}

Action Items:";

const SENTIMENT_PROMPT: &str = "You are a technical project manager analyzing a Jira ticket.
Analyze the sentiment, urgency, and tone of this ticket.
Consider both the description and any comments.

Ticket Information:
{ticket_text}

Analysis:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketAnalysis {
    pub summary: String,
    pub action_items: String,
    pub sentiment: String,
}

fn render(template: &str, ticket_text: &str) -> String {
    template.replace("{ticket_text}", ticket_text)
}

pub async fn summarize_ticket(llm: &dyn LanguageModelService, ticket_text: &str) -> AppResult<String> {
    llm.complete(&render(SUMMARY_PROMPT, ticket_text), &GenerationOptions::default())
        .await
}

pub async fn extract_action_items(
    llm: &dyn LanguageModelService,
    ticket_text: &str,
) -> AppResult<String> {
    llm.complete(
        &render(ACTION_ITEMS_PROMPT, ticket_text),
        &GenerationOptions::default(),
    )
    .await
}

pub async fn analyze_sentiment(
    llm: &dyn LanguageModelService,
    ticket_text: &str,
) -> AppResult<String> {
    llm.complete(
        &render(SENTIMENT_PROMPT, ticket_text),
        &GenerationOptions::default(),
    )
    .await
}

/// Runs the three analyses in order; model text is returned unparsed.
pub async fn analyze_ticket(
    llm: &dyn LanguageModelService,
    ticket_text: &str,
) -> AppResult<TicketAnalysis> {
    info!(model = llm.model(), "analyzing ticket text");
    Ok(TicketAnalysis {
        summary: summarize_ticket(llm, ticket_text).await?,
        action_items: extract_action_items(llm, ticket_text).await?,
        sentiment: analyze_sentiment(llm, ticket_text).await?,
    })
}
