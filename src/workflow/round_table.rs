use tracing::info;

use crate::domain::persona::Persona;
use crate::error::{AppError, AppResult};
use crate::services::{ChatMessage, GenerationOptions, LanguageModelService};

pub const DEFAULT_TOPIC: &str = "The future of humanity shaped by technology and science";
pub const DEFAULT_MAX_MESSAGES: usize = 10;
pub const DEFAULT_REPLY_TOKENS: u32 = 200;

/// Source name recorded for the opening task message.
const TASK_SOURCE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub source: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct RoundTableSettings {
    pub topic: String,
    /// Total transcript length, the opening task included.
    pub max_messages: usize,
    pub reply_tokens: u32,
}

impl Default for RoundTableSettings {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            max_messages: DEFAULT_MAX_MESSAGES,
            reply_tokens: DEFAULT_REPLY_TOKENS,
        }
    }
}

/// Personas speak in fixed round-robin order until the transcript holds
/// `max_messages` entries.
pub async fn run_round_table(
    llm: &dyn LanguageModelService,
    personas: &[Persona],
    settings: &RoundTableSettings,
) -> AppResult<Vec<TranscriptEntry>> {
    if personas.is_empty() {
        return Err(AppError::Configuration(
            "round table needs at least one persona".to_string(),
        ));
    }

    let options = GenerationOptions {
        temperature: None,
        max_tokens: Some(settings.reply_tokens),
    };
    let mut transcript = vec![TranscriptEntry {
        source: TASK_SOURCE.to_string(),
        content: settings.topic.clone(),
    }];

    for persona in personas.iter().cycle() {
        if transcript.len() >= settings.max_messages {
            break;
        }
        info!(speaker = persona.name, turn = transcript.len(), "requesting reply");
        let messages = perspective(persona, &transcript);
        let reply = llm.chat(&messages, &options).await?;
        transcript.push(TranscriptEntry {
            source: persona.name.to_string(),
            content: reply.trim().to_string(),
        });
    }

    Ok(transcript)
}

/// The conversation as seen by `persona`: its own turns are assistant
/// messages, everyone else's are user messages tagged with the speaker.
fn perspective(persona: &Persona, transcript: &[TranscriptEntry]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(ChatMessage::system(persona.system_prompt));
    for entry in transcript {
        let message = if entry.source == persona.name {
            ChatMessage::assistant(entry.content.as_str())
        } else if entry.source == TASK_SOURCE {
            ChatMessage::user(entry.content.as_str())
        } else {
            ChatMessage::user(format!("{}: {}", entry.source, entry.content))
        };
        messages.push(message);
    }
    messages
}
