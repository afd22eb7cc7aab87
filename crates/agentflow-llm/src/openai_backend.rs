//! OpenAI-compatible HTTP backend.
//!
//! Issues an authenticated POST with the standard chat-completion envelope
//! and reads the reply from `choices[0].message.content`. The request asks
//! for `response_format: json_object` since every stage of the pipeline
//! expects a JSON reply. No retries and no fallback: a failed call fails
//! the run.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{LlmBackend, LlmInvocation, LlmResult, Message, Role};
use agentflow_utils::error::LlmError;

/// Default chat-completions endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the endpoint URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Sampling parameters fixed at backend construction for the whole run.
#[derive(Debug, Clone)]
pub struct SamplingParams {
    pub temperature: f64,
    pub seed: Option<u64>,
    pub max_tokens: Option<u32>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            seed: None,
            max_tokens: None,
        }
    }
}

/// HTTP backend for an OpenAI-compatible chat-completion endpoint.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    params: SamplingParams,
}

impl OpenAiBackend {
    /// Create a backend with an explicit key and endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Misconfiguration`] if the HTTP client cannot be
    /// constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        params: SamplingParams,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            params,
        })
    }

    /// Create a backend from the environment.
    ///
    /// Reads `OPENAI_API_KEY` (required) and `OPENAI_BASE_URL` (optional).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Misconfiguration`] if the API key variable is
    /// not set. This surfaces before any call is attempted.
    pub fn from_env(params: SamplingParams) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            LlmError::Misconfiguration(format!(
                "API key not found in environment variable '{API_KEY_ENV}'. \
                 Set it, or point {BASE_URL_ENV} at a compatible endpoint with its own key."
            ))
        })?;
        let base_url = std::env::var(BASE_URL_ENV).ok();
        Self::new(api_key, base_url, params)
    }

    fn convert_messages(messages: &[Message]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|m| OpenAiMessage {
                role: match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                }
                .to_string(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        debug!(
            provider = "openai",
            run_id = %inv.run_id,
            stage = %inv.stage,
            model = %inv.model,
            timeout_secs = inv.timeout.as_secs(),
            "Invoking chat-completion endpoint"
        );

        let request_body = ChatRequest {
            model: inv.model.clone(),
            messages: Self::convert_messages(&inv.messages),
            temperature: self.params.temperature,
            seed: self.params.seed,
            max_tokens: self.params.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            stream: false,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .timeout(inv.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Transport(format!(
                "endpoint returned {status}: {body}"
            )));
        }

        let response_body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to parse response envelope: {e}")))?;

        let choice = response_body
            .choices
            .first()
            .ok_or_else(|| LlmError::Transport("response contained no choices".to_string()))?;

        let content = choice
            .message
            .content
            .clone()
            .ok_or_else(|| LlmError::Transport("response missing content in choices[0]".to_string()))?;

        let mut result = LlmResult::new(content, "openai", inv.model);
        if let Some(usage) = response_body.usage {
            result.tokens_input = Some(usage.prompt_tokens);
            result.tokens_output = Some(usage.completion_tokens);
        }

        debug!(
            provider = "openai",
            stage = %inv.stage,
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            "Invocation completed"
        );

        Ok(result)
    }
}

/// Chat-completion message for requests.
#[derive(Debug, Clone, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

/// Chat-completion message in responses.
#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat-completion request body.
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
    stream: bool,
}

/// Chat-completion response body.
#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
