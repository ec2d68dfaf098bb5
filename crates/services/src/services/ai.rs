use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::AiConfig;

const SUBTASKS_SYSTEM_PROMPT: &str = "You are a helpful project manager. Generate a list of \
subtasks for the following task description. Return only a JSON object of the form \
{\"subtasks\": [\"...\"]}.";

const SUMMARIZE_SYSTEM_PROMPT: &str =
    "Summarize the following task description concisely in 1-2 sentences.";

#[derive(Debug, Error)]
pub enum AiServiceError {
    #[error("AI API key is not configured")]
    MissingApiKey,
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("Unexpected AI response: {0}")]
    Upstream(String),
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Thin gateway over an OpenAI-compatible chat-completions endpoint.
/// Single-shot requests, no retries.
#[derive(Clone)]
pub struct AiService {
    client: reqwest::Client,
    config: AiConfig,
}

impl AiService {
    pub fn new(config: AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, AiServiceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AiServiceError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiServiceError::Upstream("response carried no content".to_string()))
    }

    /// Break a task description into subtasks. Content the model returns
    /// that does not parse as the requested JSON yields an empty list, not
    /// an error.
    pub async fn generate_subtasks(
        &self,
        task_description: &str,
    ) -> Result<Vec<String>, AiServiceError> {
        let content = self.chat(SUBTASKS_SYSTEM_PROMPT, task_description).await?;
        Ok(parse_subtasks(&content))
    }

    pub async fn summarize_task(&self, content: &str) -> Result<String, AiServiceError> {
        self.chat(SUMMARIZE_SYSTEM_PROMPT, content).await
    }
}

fn parse_subtasks(content: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(content.trim()) else {
        tracing::warn!("AI subtask response was not valid JSON");
        return Vec::new();
    };
    let Some(items) = value.get("subtasks").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.as_str().map(|s| s.to_string()))
        .collect()
}
