use tracing::info;

use crate::context::AppContext;
use crate::domain::document::Document;
use crate::error::{AppError, AppResult};

/// Marker that distinguishes Zephyr test-case keys (`WR-T123`) from issue keys.
const TEST_CASE_MARKER: &str = "-T";

#[derive(Debug, Clone)]
pub enum TicketQuery {
    Key(String),
    Jql { jql: String, max_results: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSource {
    Jira,
    Zephyr,
}

pub struct TicketWorkflowOutcome {
    pub source: TicketSource,
    pub documents: Vec<Document>,
}

/// Resolves the query against Zephyr or Jira and formats every record found.
pub async fn load_ticket_documents(
    ctx: &AppContext,
    query: &TicketQuery,
) -> AppResult<TicketWorkflowOutcome> {
    let key = match query {
        TicketQuery::Jql { jql, max_results } => {
            info!("searching Jira with JQL: {jql}");
            let tickets = ctx.issue_tracker.search_issues(jql, *max_results).await?;
            return Ok(TicketWorkflowOutcome {
                source: TicketSource::Jira,
                documents: tickets.iter().map(|ticket| ticket.to_document()).collect(),
            });
        }
        TicketQuery::Key(key) => key.trim(),
    };

    if key.is_empty() {
        return Err(AppError::Configuration(
            "no issue key given; pass --key or set JIRA_ISSUE_KEY".to_string(),
        ));
    }

    if !ctx.config.prefers_zephyr() {
        info!("using Jira API");
        return Ok(TicketWorkflowOutcome {
            source: TicketSource::Jira,
            documents: vec![fetch_jira_document(ctx, key).await?],
        });
    }

    info!("using Zephyr API");
    if key.contains(TEST_CASE_MARKER) {
        let case = ctx.test_management.load_test_case(key).await?;
        return Ok(TicketWorkflowOutcome {
            source: TicketSource::Zephyr,
            documents: vec![case.to_document(key)],
        });
    }

    info!("loading test executions for issue {key}");
    let executions = ctx.test_management.load_issue_executions(key).await?;
    if !executions.is_empty() {
        return Ok(TicketWorkflowOutcome {
            source: TicketSource::Zephyr,
            documents: executions
                .iter()
                .map(|execution| execution.to_document(key))
                .collect(),
        });
    }

    info!("no test cases found for issue {key}");
    if ctx.config.jira_email.is_some() && ctx.config.jira_token.is_some() {
        info!("falling back to Jira API to fetch the issue");
        return Ok(TicketWorkflowOutcome {
            source: TicketSource::Jira,
            documents: vec![fetch_jira_document(ctx, key).await?],
        });
    }

    Ok(TicketWorkflowOutcome {
        source: TicketSource::Zephyr,
        documents: Vec::new(),
    })
}

async fn fetch_jira_document(ctx: &AppContext, key: &str) -> AppResult<Document> {
    let ticket = ctx.issue_tracker.fetch_issue(key).await?;
    Ok(ticket.to_document())
}
