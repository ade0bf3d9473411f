//! Prompt types for FAQ Bot.

use serde::{Deserialize, Serialize};

/// Literal the model is told to return when the context has no answer.
pub const NONE_SENTINEL: &str = "NONE";

/// Identifier of the built-in template pair.
pub const DEFAULT_TEMPLATE_ID: &str = "faq.answer.default";

/// Per-document block. `course` is filter-only and never rendered.
pub const DEFAULT_CONTEXT_TEMPLATE: &str = "Section: {{section}}
Question: {{question}}
Answer: {{text}}";

/// Instructional template wrapping the question and the assembled context.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You're a course teaching assistant.
Answer the user QUESTION based on CONTEXT — the documents retrieved from our FAQ database.
Don't use any external knowledge. If the CONTEXT doesn't contain the answer, return \"NONE\".

QUESTION:
{{user_question}}

CONTEXT:
{{context}}";

/// The pair of templates used to turn documents and a question into a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// Template identifier, reported in prompt metadata
    pub id: String,

    /// Template for a single document block
    pub context: String,

    /// Template for the full prompt
    pub prompt: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            context: DEFAULT_CONTEXT_TEMPLATE.to_string(),
            prompt: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

/// A template file as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptFile {
    /// Unique template identifier
    pub id: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Document block template
    pub context: String,

    /// Full prompt template
    pub prompt: String,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source template ID
    #[serde(rename = "templateId")]
    pub template_id: String,

    /// Number of documents rendered into the context
    #[serde(rename = "documentCount")]
    pub document_count: usize,

    /// Length of the assembled context in bytes
    #[serde(rename = "contextLength")]
    pub context_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_file_deserialization() {
        let yaml = r#"
id: faq.answer.custom
apiVersion: "1.0"
context: "Q: {{question}}"
prompt: "{{user_question}} / {{context}}"
"#;

        let file: PromptFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.id, "faq.answer.custom");
        assert_eq!(file.api_version, "1.0");
        assert_eq!(file.context, "Q: {{question}}");
    }

    #[test]
    fn test_default_templates_mention_sentinel() {
        let templates = PromptTemplates::default();
        assert!(templates.prompt.contains("return \"NONE\""));
        assert!(!templates.context.contains("course"));
    }
}
