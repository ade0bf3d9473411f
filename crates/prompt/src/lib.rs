//! Prompt system for FAQ Bot.
//!
//! This crate turns retrieved FAQ documents and a user question into a
//! single model input:
//! - Handlebars template rendering
//! - Context assembly from documents in relevance order
//! - Optional YAML template overrides

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_context, build_prompt, PromptBuilder};
pub use loader::load_templates;
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptFile, PromptTemplates, NONE_SENTINEL,
};
