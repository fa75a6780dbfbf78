/// LLM Client: the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// Handlers talk to a `CompletionProvider`; `LlmClient` is the production backend.
///
/// The wire format is the OpenAI-compatible chat-completions schema served by DeepSeek.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const TEMPERATURE: f32 = 0.9;
/// Returned when the API answers successfully but carries no message content.
pub const NO_REPLY: &str = "(no reply)";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The completion boundary. Implement this to swap providers without touching
/// the handlers; carried in `AppState` as `Arc<dyn CompletionProvider>`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `instructions` as the system message and `user_text` as the user message.
    async fn generate(&self, instructions: &str, user_text: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

/// Production completion backend. One request per call, no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the completion API, returning the full response object.
    pub async fn call(
        &self,
        instructions: &str,
        user_text: &str,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instructions,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn generate(&self, instructions: &str, user_text: &str) -> Result<String, LlmError> {
        let response = self.call(instructions, user_text).await?;
        Ok(response.text().unwrap_or(NO_REPLY).to_string())
    }
}
