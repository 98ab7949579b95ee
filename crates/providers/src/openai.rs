//! OpenAI chat-completions client that drafts phone scripts.

use std::time::Duration;

use async_trait::async_trait;
use callpilot_core::call::ScriptInput;
use callpilot_core::error::CoreError;
use callpilot_core::providers::ScriptGenerator;
use callpilot_core::script::render_preferred_date;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_success, ProviderError};

const PROVIDER: &str = "OpenAI";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// HTTP timeout for one completion request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You write short, warm, professional phone scripts for calling a \
business to book an appointment on someone's behalf. Speak in the first person as the caller. \
Keep it under 150 words, state the goal early, propose the preferred date and time, offer \
flexibility, and end politely. Return only the script text.";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// OpenAI connection settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `OPENAI_API_KEY` is unset or blank, meaning scripts
    /// fall back to local synthesis.
    ///
    /// | Variable          | Required | Default                      |
    /// |-------------------|----------|------------------------------|
    /// | `OPENAI_API_KEY`  | yes      | -                            |
    /// | `OPENAI_MODEL`    | no       | `gpt-4o-mini`                |
    /// | `OPENAI_BASE_URL` | no       | `https://api.openai.com/v1`  |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_key,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

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
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Script generator backed by the OpenAI chat-completions endpoint.
pub struct OpenAiScriptGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiScriptGenerator {
    pub fn new(config: OpenAiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    /// Request a script completion for `input`.
    pub async fn complete(&self, input: &ScriptInput) -> Result<String, ProviderError> {
        let prompt = build_prompt(input);
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(PROVIDER, response).await?;
        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: PROVIDER,
                reason: "completion contained no script text".to_string(),
            })
    }
}

#[async_trait]
impl ScriptGenerator for OpenAiScriptGenerator {
    async fn generate_script(&self, input: &ScriptInput) -> Result<String, CoreError> {
        tracing::debug!(model = %self.config.model, "Requesting AI script");
        Ok(self.complete(input).await?)
    }
}

/// User prompt describing the appointment.
pub fn build_prompt(input: &ScriptInput) -> String {
    let mut lines = vec![
        format!("Caller name: {}", input.client_name),
        format!("Calling on behalf of: {}", input.business_name),
        format!("Appointment goal: {}", input.appointment_goal),
        format!(
            "Preferred date: {}",
            render_preferred_date(&input.preferred_date)
        ),
    ];
    if !input.preferred_time_window.trim().is_empty() {
        lines.push(format!("Preferred time window: {}", input.preferred_time_window));
    }
    if !input.notes.trim().is_empty() {
        lines.push(format!("Additional context: {}", input.notes));
    }
    lines.join("\n")
}
