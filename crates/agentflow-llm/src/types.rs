//! Core types for the LLM backend boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use agentflow_utils::error::LlmError;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Input to one backend invocation.
#[derive(Debug, Clone)]
pub struct LlmInvocation {
    /// Run id, for log correlation.
    pub run_id: String,
    /// Stage label (e.g. "normalize", "draft:WorkerA", "final_judge").
    pub stage: String,
    /// Model identifier for this call.
    pub model: String,
    /// Request timeout for this call.
    pub timeout: Duration,
    /// Ordered conversation messages.
    pub messages: Vec<Message>,
}

impl LlmInvocation {
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        stage: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            stage: stage.into(),
            model: model.into(),
            timeout,
            messages,
        }
    }
}

/// Result of one backend invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResult {
    /// Raw response text; for this pipeline, expected to be JSON.
    pub raw_response: String,
    /// Provider name (e.g. "openai").
    pub provider: String,
    /// Model that actually served the call.
    pub model_used: String,
    /// Input tokens consumed, when the provider reports them.
    pub tokens_input: Option<u64>,
    /// Output tokens generated, when the provider reports them.
    pub tokens_output: Option<u64>,
}

impl LlmResult {
    #[must_use]
    pub fn new(
        raw_response: impl Into<String>,
        provider: impl Into<String>,
        model_used: impl Into<String>,
    ) -> Self {
        Self {
            raw_response: raw_response.into(),
            provider: provider.into(),
            model_used: model_used.into(),
            tokens_input: None,
            tokens_output: None,
        }
    }
}

/// Trait for LLM backend implementations.
///
/// The sequencer holds a `dyn LlmBackend` and issues one call per stage
/// exchange. Implementations do not retry; any failure is returned as-is
/// and aborts the run.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Invoke the model with the given conversation.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Transport`] for network failures, non-2xx
    /// statuses, and responses without usable content.
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError>;
}
