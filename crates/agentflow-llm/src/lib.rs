//! LLM backend abstraction for the agentflow pipeline.
//!
//! The sequencer talks to the model through the [`LlmBackend`] trait so it
//! never knows whether the other side is a real HTTP endpoint or a scripted
//! stub in tests. The one production implementation, [`OpenAiBackend`],
//! speaks the OpenAI chat-completion envelope over authenticated HTTP.

mod openai_backend;
mod types;

pub use openai_backend::{OpenAiBackend, SamplingParams};
pub use types::{LlmBackend, LlmInvocation, LlmResult, Message, Role};

pub use agentflow_utils::error::LlmError;
