//! Q&A result types.

use faq_core::{AppConfig, AppError, AppResult};
use faq_llm::LlmUsage;
use faq_prompt::{load_templates, PromptTemplates, NONE_SENTINEL};
use faq_search::types::{DEFAULT_COURSE, DEFAULT_INDEX, DEFAULT_MAX_RESULTS};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Marker placed in front of every flattened failure message.
pub const ERROR_PREFIX: &str = "Error in Q&A pipeline: ";

/// Settings the orchestrator applies to every question.
#[derive(Debug, Clone)]
pub struct QaSettings {
    /// Index searched for FAQ documents
    pub index: String,

    /// Maximum documents retrieved per question
    pub max_results: usize,

    /// Course filter applied to every search
    pub course: String,

    /// Generation model identifier
    pub model: String,

    /// Sampling temperature passed to the generation client
    pub temperature: Option<f32>,

    /// Cap on generated tokens
    pub max_tokens: Option<u32>,

    /// Context and prompt templates
    pub templates: PromptTemplates,
}

impl Default for QaSettings {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            course: DEFAULT_COURSE.to_string(),
            model: faq_llm::providers::gemini::DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            templates: PromptTemplates::default(),
        }
    }
}

impl QaSettings {
    /// Derive settings from the application config, loading template
    /// overrides when a prompt file is configured.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let templates = match &config.prompt_file {
            Some(path) => load_templates(path)?,
            None => PromptTemplates::default(),
        };

        Ok(Self {
            index: config.search.index.clone(),
            max_results: config.search.max_results,
            course: config.search.course.clone(),
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            templates,
        })
    }
}

/// A successfully generated answer.
#[derive(Debug, Clone, Serialize)]
pub struct QaAnswer {
    /// Generated text, returned verbatim
    pub answer: String,

    /// Model that produced the answer
    pub model: String,

    /// Token usage reported by the provider
    pub usage: LlmUsage,

    /// Number of retrieved documents placed in the prompt
    pub documents: usize,
}

impl QaAnswer {
    /// Whether the model reported that the context had no answer.
    pub fn is_none(&self) -> bool {
        self.answer.trim() == NONE_SENTINEL
    }
}

/// Pipeline step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Search backend unreachable, index missing, or query rejected
    Retrieval,

    /// A retrieved document could not be rendered into the prompt
    Formatting,

    /// Generation API rejected or failed the request
    Generation,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieval => "retrieval",
            Self::Formatting => "formatting",
            Self::Generation => "generation",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A categorized pipeline failure.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct QaFailure {
    /// Step that failed
    pub stage: FailureStage,

    /// Underlying error
    #[source]
    pub error: AppError,
}

impl QaFailure {
    pub fn new(stage: FailureStage, error: AppError) -> Self {
        Self { stage, error }
    }

    /// Flatten into the single displayable string used as a fallback answer.
    pub fn to_answer_text(&self) -> String {
        format!("{}{}", ERROR_PREFIX, self.error)
    }
}

/// Trim a submitted question, rejecting empty or whitespace-only input.
pub fn normalize_question(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
