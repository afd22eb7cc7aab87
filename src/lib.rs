//! agentflow: a fixed multi-persona drafting pipeline over a
//! chat-completion endpoint.
//!
//! One run takes a single prompt through eight stages: the task is
//! normalized, four worker personas draft independent solutions, a
//! fact-checker and a rubric scorer evaluate the drafts, a synthesizer
//! turns the evaluations into a shared edit plan, every worker revises its
//! own draft against that plan, and a final judge picks the winner. The
//! complete audit trail is written out as one JSON run log.
//!
//! The workspace crates split along the seams:
//! - [`agentflow_model`]: the record types and response coercion
//! - [`agentflow_prompts`]: per-stage prompt construction
//! - [`agentflow_llm`]: the backend trait and the OpenAI-compatible client
//! - [`agentflow_engine`]: the stage sequencer and run-log persistence
//!
//! This crate adds the command-line surface on top.

pub mod cli;

pub use agentflow_engine::{RunLogWriter, WorkflowOptions, run_workflow};
pub use agentflow_model::RunLog;
