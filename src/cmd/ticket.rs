use std::io::{self, Write};

use clap::Args;

use crate::context::AppContext;
use crate::domain::document::{Document, combine};
use crate::error::AppResult;
use crate::infra::jira::DEFAULT_SEARCH_LIMIT;
use crate::workflow::analysis::{TicketAnalysis, analyze_ticket};
use crate::workflow::ticket::{TicketQuery, TicketSource, load_ticket_documents};

const RULE_WIDTH: usize = 60;

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    /// Jira issue key or Zephyr test-case key (defaults to JIRA_ISSUE_KEY).
    #[arg(short, long)]
    pub key: Option<String>,
    /// Load every issue matching this JQL query instead of a single key.
    #[arg(long, conflicts_with = "key")]
    pub jql: Option<String>,
    /// Maximum number of issues a JQL search returns.
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT, requires = "jql")]
    pub max_results: u32,
    /// Run the AI analysis without asking.
    #[arg(long, conflicts_with = "no_analyze")]
    pub analyze: bool,
    /// Skip the AI analysis without asking.
    #[arg(long)]
    pub no_analyze: bool,
    /// Override the analysis model.
    #[arg(long)]
    pub model: Option<String>,
}

impl TicketArgs {
    /// `Some` when the flags settle whether to analyze.
    fn analysis_choice(&self) -> Option<bool> {
        match (self.analyze, self.no_analyze) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub async fn run(ctx: &AppContext, args: TicketArgs) -> AppResult<()> {
    let (query, label) = match &args.jql {
        Some(jql) => (
            TicketQuery::Jql {
                jql: jql.clone(),
                max_results: args.max_results,
            },
            jql.clone(),
        ),
        None => {
            let key = args
                .key
                .clone()
                .or_else(|| ctx.config.jira_issue_key.clone())
                .unwrap_or_default();
            (TicketQuery::Key(key.clone()), key)
        }
    };

    let zephyr = args.jql.is_none() && ctx.config.prefers_zephyr();
    if zephyr {
        println!("Fetching Zephyr test cases for {label}");
    } else {
        println!("Fetching Jira ticket: {label}");
    }
    println!("{}", rule());

    let outcome = load_ticket_documents(ctx, &query).await?;
    if zephyr && outcome.source == TicketSource::Jira {
        println!("No test cases found; showing the Jira issue instead.");
    }

    if outcome.documents.is_empty() {
        println!("No data found for: {label}");
        return Ok(());
    }

    print!("{}", render_documents(&outcome.documents));

    let wants_analysis = match args.analysis_choice() {
        Some(choice) => choice,
        None => confirm("Analyze with AI? (y/n): ")?,
    };
    if wants_analysis {
        let text = combine(&outcome.documents);
        let analysis = analyze_ticket(ctx.language_model.as_ref(), &text).await?;
        print!("{}", render_analysis(&analysis));
    }

    Ok(())
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn render_documents(documents: &[Document]) -> String {
    let mut out = String::new();
    let total = documents.len();
    for (index, document) in documents.iter().enumerate() {
        if total > 1 {
            out.push_str(&format!(
                "\n{rule}\nDocument {} of {total}\n{rule}\n",
                index + 1,
                rule = rule()
            ));
        }
        out.push_str(&format!("\n{}\n", document.page_content));
        out.push_str(&format!("\n{}\nMetadata:\n", rule()));
        for (key, value) in &document.metadata {
            out.push_str(&format!("  {key}: {value}\n"));
        }
    }
    out.push_str(&format!("{}\n", rule()));
    out
}

fn render_analysis(analysis: &TicketAnalysis) -> String {
    [
        ("AI SUMMARY", &analysis.summary),
        ("ACTION ITEMS", &analysis.action_items),
        ("SENTIMENT ANALYSIS", &analysis.sentiment),
    ]
    .iter()
    .map(|(title, body)| format!("\n{rule}\n{title}\n{rule}\n{body}\n", rule = rule()))
    .collect()
}

fn confirm(question: &str) -> AppResult<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{question}")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
