// [libs/domain/ai-cortex/src/lib.rs]
//! Prompt composition for the analysis job controller: turns a project's
//! summary rows, a single device record, or a pair of raw config versions
//! into the `{kind, project_context, device_context?, include_original?}`
//! payload the LLM adapter contract expects.

pub mod errors;
pub mod prompt;

pub use errors::PromptError;
pub use prompt::{compose, device_context, drift_context, project_context, ComposeInput, PromptRequest};
