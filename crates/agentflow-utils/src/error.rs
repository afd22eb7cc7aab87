//! Error types for the agentflow pipeline.
//!
//! Every failure is fatal: nothing in the pipeline retries, downgrades, or
//! checkpoints. A run either completes all eight stages or leaves no run log.

use thiserror::Error;

/// Errors from the LLM backend boundary.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Required client configuration is absent or invalid.
    ///
    /// Raised at backend construction, before any call is attempted.
    #[error("LLM backend misconfigured: {0}")]
    Misconfiguration(String),

    /// The call to the model endpoint failed outright: network error,
    /// non-2xx status, or a response envelope with no usable content.
    #[error("LLM transport error: {0}")]
    Transport(String),
}

/// Errors from coercing model-returned JSON into typed records.
///
/// The coercion layer is total for string and list fields; only fields
/// requiring numeric parsing can fail.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A field expected to be numeric could not be coerced.
    #[error("field '{field}' expected a number, got {value}")]
    NonNumeric { field: String, value: String },
}

/// Top-level error for pipeline execution.
#[derive(Error, Debug)]
pub enum AgentFlowError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model's returned content is not valid JSON text.
    #[error("stage '{stage}' returned malformed JSON: {source}")]
    MalformedResponse {
        stage: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A stage exceeded the configured timeout.
    #[error("stage '{stage}' timed out after {seconds}s")]
    StageTimeout { stage: String, seconds: u64 },

    /// The run log could not be written to disk.
    #[error("run log write failed at {path}: {reason}")]
    RunLogWrite { path: String, reason: String },

    /// A worker task panicked or was cancelled before producing a result.
    #[error("worker task for '{worker_id}' failed: {reason}")]
    WorkerTask { worker_id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
