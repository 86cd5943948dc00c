//! Core contract shared by every Synaptic integration crate.
//!
//! An agent framework talks to integrations through the [`Tool`] trait: each
//! tool advertises a name, a description and a JSON-schema for its arguments,
//! and exposes a single async [`Tool::call`] entry point. Failures are reported
//! as [`SynapticError`].

mod error;
mod tool;

pub use error::SynapticError;
pub use tool::{Tool, ToolDefinition};
