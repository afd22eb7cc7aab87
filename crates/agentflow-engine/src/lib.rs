//! Pipeline engine: the eight-stage sequencer and run-log persistence.
//!
//! `run_workflow` drives one complete run against an [`agentflow_llm::LlmBackend`];
//! `RunLogWriter` persists the resulting [`agentflow_model::RunLog`] atomically.

mod config;
mod runlog;
mod workflow;

pub use config::{WorkflowOptions, default_evaluators, default_workers, now_run_id};
pub use runlog::RunLogWriter;
pub use workflow::run_workflow;

pub use agentflow_utils::error::AgentFlowError;
