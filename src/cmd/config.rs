use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

struct Field {
    label: &'static str,
    secret: bool,
    slot: fn(&mut StoredConfig) -> &mut Option<String>,
}

const FIELDS: [Field; 10] = [
    Field {
        label: "Jira base URL (e.g., https://company.atlassian.net)",
        secret: false,
        slot: |cfg| &mut cfg.jira_base_url,
    },
    Field {
        label: "Jira email",
        secret: false,
        slot: |cfg| &mut cfg.jira_email,
    },
    Field {
        label: "Jira API token",
        secret: true,
        slot: |cfg| &mut cfg.jira_token,
    },
    Field {
        label: "Default Jira issue key",
        secret: false,
        slot: |cfg| &mut cfg.jira_issue_key,
    },
    Field {
        label: "Zephyr access token",
        secret: true,
        slot: |cfg| &mut cfg.zephyr_token,
    },
    Field {
        label: "Ollama host",
        secret: false,
        slot: |cfg| &mut cfg.ollama_host,
    },
    Field {
        label: "Ticket analysis model",
        secret: false,
        slot: |cfg| &mut cfg.analyzer_model,
    },
    Field {
        label: "PDF summary model",
        secret: false,
        slot: |cfg| &mut cfg.summarizer_model,
    },
    Field {
        label: "Round table model",
        secret: false,
        slot: |cfg| &mut cfg.round_table_model,
    },
    Field {
        label: "Odyssey model",
        secret: false,
        slot: |cfg| &mut cfg.odyssey_model,
    },
];

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring parley.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Environment variables (JIRA_URL, JIRA_API_TOKEN, ...) override these values.");
    println!();

    for field in &FIELDS {
        let target = (field.slot)(&mut cfg);
        let action = prompt(field.label, target.as_deref(), field.secret)?;
        action.apply(target);
    }

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    for field in &FIELDS {
        let value = (field.slot)(&mut cfg);
        let shown = if field.secret {
            mask_secret(value)
        } else {
            display_value(value)
        };
        println!("{}: {shown}", short_label(field.label));
    }

    Ok(())
}

fn short_label(label: &str) -> &str {
    label.split(" (").next().unwrap_or(label)
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(token) if token.chars().count() > 6 => {
            let prefix: String = token.chars().take(3).collect();
            let suffix: String = token.chars().skip(token.chars().count() - 3).collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        match input.trim() {
            "" => PromptAction::Keep,
            "-" => PromptAction::Clear,
            value => PromptAction::Set(value.to_string()),
        }
    }

    fn apply(self, target: &mut Option<String>) {
        match self {
            PromptAction::Keep => {}
            PromptAction::Clear => *target = None,
            PromptAction::Set(value) => *target = Some(value),
        }
    }
}
