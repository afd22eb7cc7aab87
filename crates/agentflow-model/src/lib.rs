//! Data model for the agentflow pipeline.
//!
//! `records` holds the typed artifacts every stage produces; `decode` is the
//! coercion layer that turns untrusted model JSON into those records. The
//! records serialize back to disk with the same field names the decoders
//! read, so a persisted run log round-trips verbatim.

pub mod decode;
pub mod records;

pub use records::*;
