//! Shared infrastructure for the agentflow workspace.
//!
//! Error taxonomy, atomic file writes, and tracing setup live here so that
//! the model, llm, and engine crates can share one set of error types
//! without depending on each other.

pub mod atomic_write;
pub mod error;
pub mod logging;
