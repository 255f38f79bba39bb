use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::{ChatMessage, GenerationOptions, LanguageModelService};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Chat client for a local Ollama server.
pub struct OllamaClient {
    http: Client,
    host: String,
    model: String,
}

impl OllamaClient {
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| {
                AppError::LanguageModel(format!("failed to create HTTP client: {err}"))
            })?;
        Ok(Self {
            http,
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

#[async_trait]
impl LanguageModelService for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> AppResult<String> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };
        debug!(model = %self.model, messages = messages.len(), "sending chat request");

        let response = self
            .http
            .post(self.chat_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                AppError::LanguageModel(format!(
                    "failed to reach Ollama at {}: {err}",
                    self.host
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "Ollama responded with {status}: {body}"
            )));
        }

        let payload: OllamaChatResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse Ollama response: {err}"))
        })?;
        Ok(payload.message.content)
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}
