mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod redact;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::odyssey::{self, OdysseyArgs};
use crate::cmd::round_table::{self, RoundTableArgs};
use crate::cmd::summarize::{self, SummarizeArgs};
use crate::cmd::ticket::{self, TicketArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;
use crate::infra::ollama::OllamaClient;
use crate::infra::zephyr::ZephyrClient;
use crate::redact::redact;

#[derive(Parser)]
#[command(
    name = "parley",
    author,
    version,
    about = "Jira tickets, PDF summaries and persona round tables on a local model"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a Jira issue or Zephyr test cases and optionally analyze them.
    Ticket(TicketArgs),
    /// Summarize a PDF with map-reduce or refine.
    Summarize(SummarizeArgs),
    /// Let five historical personas discuss a topic.
    RoundTable(RoundTableArgs),
    /// Have the model plan Odysseus' voyage through a task list.
    Odyssey(OdysseyArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    };
    let secrets = config.secrets();

    if let Err(error) = run(cli.command, config).await {
        eprintln!("Error: {}", redact(&error.to_string(), &secrets));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parley=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands, config: AppConfig) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Ticket(args) => {
            warn_missing_jira_settings(&config);
            let model = args.model.clone().unwrap_or_else(|| config.models.analyzer.clone());
            let ctx = build_context(config, &model)?;
            ticket::run(&ctx, args).await
        }
        Commands::Summarize(args) => {
            let model = args.model.clone().unwrap_or_else(|| config.models.summarizer.clone());
            let ctx = build_context(config, &model)?;
            summarize::run(&ctx, args).await
        }
        Commands::RoundTable(args) => {
            let model = args.model.clone().unwrap_or_else(|| config.models.round_table.clone());
            let ctx = build_context(config, &model)?;
            round_table::run(&ctx, args).await
        }
        Commands::Odyssey(args) => {
            let model = args.model.clone().unwrap_or_else(|| config.models.odyssey.clone());
            let ctx = build_context(config, &model)?;
            odyssey::run(&ctx, args).await
        }
    }
}

fn warn_missing_jira_settings(config: &AppConfig) {
    if config.jira_base_url.is_none() {
        warn!("Jira base URL not configured (JIRA_URL); Jira requests will fail.");
    }
    if config.jira_email.is_none() {
        warn!("Jira email not configured (JIRA_EMAIL); Jira requests will fail.");
    }
    if config.jira_token.is_none() {
        warn!("Jira token not configured (JIRA_API_TOKEN); Jira requests will fail.");
    }
}

fn build_context(config: AppConfig, model: &str) -> AppResult<AppContext> {
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        config.jira_email.clone(),
        config.jira_token.clone(),
    ));
    let test_management = Arc::new(ZephyrClient::new(
        config.zephyr_access_token(),
        config.debug_http,
    ));
    let language_model = Arc::new(OllamaClient::new(config.ollama_host.clone(), model)?);

    Ok(AppContext::new(
        config,
        issue_tracker,
        test_management,
        language_model,
    ))
}
