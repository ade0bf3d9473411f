//! Prompt builder: renders retrieved documents and the user question into
//! a single model input.
//!
//! Rendering is pure and deterministic. Identical inputs always produce
//! identical output.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptTemplates};
use faq_core::{AppError, AppResult};
use faq_search::Document;
use handlebars::Handlebars;
use std::collections::HashMap;

const CONTEXT_TEMPLATE_NAME: &str = "context";
const PROMPT_TEMPLATE_NAME: &str = "prompt";

/// Separator between rendered document blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Renders context blocks and prompts from a pair of templates.
pub struct PromptBuilder {
    template_id: String,
    registry: Handlebars<'static>,
}

impl PromptBuilder {
    /// Compile the given templates.
    pub fn new(templates: &PromptTemplates) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Plain text output, and unknown variables are errors rather than blanks
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        registry
            .register_template_string(CONTEXT_TEMPLATE_NAME, &templates.context)
            .map_err(|e| {
                AppError::Prompt(format!("Failed to register context template: {}", e))
            })?;
        registry
            .register_template_string(PROMPT_TEMPLATE_NAME, &templates.prompt)
            .map_err(|e| {
                AppError::Prompt(format!("Failed to register prompt template: {}", e))
            })?;

        Ok(Self {
            template_id: templates.id.clone(),
            registry,
        })
    }

    /// Assemble the context string from documents in retrieval order.
    ///
    /// Each document becomes one block; blocks are separated by a blank line
    /// and the result is trimmed. An empty slice yields an empty string.
    pub fn build_context(&self, documents: &[Document]) -> AppResult<String> {
        let blocks = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| self.render_block(i, doc))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(blocks.join(BLOCK_SEPARATOR).trim().to_string())
    }

    /// Substitute the question and the assembled context into the prompt template.
    pub fn build_prompt(&self, question: &str, documents: &[Document]) -> AppResult<BuiltPrompt> {
        tracing::debug!(
            "Building prompt '{}' from {} documents",
            self.template_id,
            documents.len()
        );

        let context = self.build_context(documents)?;

        let mut variables = HashMap::new();
        variables.insert("user_question", question);
        variables.insert("context", context.as_str());

        let text = self.render(PROMPT_TEMPLATE_NAME, &variables)?;

        Ok(BuiltPrompt {
            text,
            metadata: BuiltPromptMetadata {
                template_id: self.template_id.clone(),
                document_count: documents.len(),
                context_length: context.len(),
            },
        })
    }

    fn render_block(&self, position: usize, doc: &Document) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("section", required_field(position, "section", &doc.section)?);
        variables.insert("question", required_field(position, "question", &doc.question)?);
        variables.insert("text", required_field(position, "text", &doc.text)?);

        self.render(CONTEXT_TEMPLATE_NAME, &variables)
    }

    fn render(&self, name: &str, variables: &HashMap<&str, &str>) -> AppResult<String> {
        self.registry
            .render(name, variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render {} template: {}", name, e)))
    }
}

/// Fetch a field the context block needs, naming the 1-based document on failure.
fn required_field<'a>(
    position: usize,
    field: &str,
    value: &'a Option<String>,
) -> AppResult<&'a str> {
    value.as_deref().ok_or_else(|| {
        AppError::Prompt(format!(
            "Document {} is missing required field '{}'",
            position + 1,
            field
        ))
    })
}

/// Assemble the context with the built-in templates.
pub fn build_context(documents: &[Document]) -> AppResult<String> {
    PromptBuilder::new(&PromptTemplates::default())?.build_context(documents)
}

/// Build a prompt with the built-in templates.
///
/// # Example
/// ```no_run
/// use faq_prompt::build_prompt;
/// use faq_search::Document;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let docs = vec![Document::new("General", "When does it start?", "In January.")];
/// let built = build_prompt("When is the start date?", &docs)?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(question: &str, documents: &[Document]) -> AppResult<BuiltPrompt> {
    PromptBuilder::new(&PromptTemplates::default())?.build_prompt(question, documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Document> {
        vec![
            Document::new("General", "Can I still join?", "Yes, anytime."),
            Document::new("Module 1", "Docker won't start", "Restart the daemon.")
                .with_course("data-engineering-zoomcamp"),
        ]
    }

    #[test]
    fn test_context_single_document() {
        let context = build_context(&[Document::new("S", "Q", "T")]).unwrap();
        assert_eq!(context, "Section: S\nQuestion: Q\nAnswer: T");
    }

    #[test]
    fn test_context_blocks_in_order_with_blank_line() {
        let context = build_context(&docs()).unwrap();
        assert_eq!(
            context,
            "Section: General\nQuestion: Can I still join?\nAnswer: Yes, anytime.\n\n\
             Section: Module 1\nQuestion: Docker won't start\nAnswer: Restart the daemon."
        );
        assert_eq!(context.matches("Section: ").count(), 2);
        assert!(!context.contains("\n\n\n"));
        assert!(!context.contains("zoomcamp"));
    }

    #[test]
    fn test_context_empty() {
        assert_eq!(build_context(&[]).unwrap(), "");
    }

    #[test]
    fn test_context_trims_outer_whitespace() {
        let doc = Document::new("S", "Q", "T\n\n");
        assert_eq!(
            build_context(&[doc]).unwrap(),
            "Section: S\nQuestion: Q\nAnswer: T"
        );
    }

    #[test]
    fn test_missing_field_is_prompt_error() {
        let mut broken = Document::new("S", "Q", "T");
        broken.text = None;
        let documents = vec![Document::new("A", "B", "C"), broken];

        match build_context(&documents) {
            Err(AppError::Prompt(msg)) => {
                assert!(msg.contains("Document 2"));
                assert!(msg.contains("'text'"));
            }
            other => panic!("Expected prompt error, got {:?}", other),
        }
    }

    #[test]
    fn test_prompt_layout() {
        let built = build_prompt("U", &[Document::new("S", "Q", "T")]).unwrap();

        assert!(built.text.contains("Section: S"));
        assert!(built.text.contains("Question: Q"));
        assert!(built.text.contains("Answer: T"));
        assert!(built.text.contains("QUESTION:\nU"));
        assert!(built.text.starts_with("You're a course teaching assistant."));
        assert!(built.text.ends_with("CONTEXT:\nSection: S\nQuestion: Q\nAnswer: T"));
        assert_eq!(built.metadata.document_count, 1);
        assert_eq!(built.metadata.template_id, "faq.answer.default");
    }

    #[test]
    fn test_prompt_question_precedes_context() {
        let documents = docs();
        let built = build_prompt("How do I join late?", &documents).unwrap();
        let context = build_context(&documents).unwrap();

        let question_at = built.text.find("How do I join late?").unwrap();
        let context_at = built.text.find(&context).unwrap();
        assert!(question_at < context_at);
        assert_eq!(built.metadata.context_length, context.len());
    }

    #[test]
    fn test_prompt_with_empty_context() {
        let built = build_prompt("Anything?", &[]).unwrap();
        assert!(built.text.ends_with("QUESTION:\nAnything?\n\nCONTEXT:\n"));
        assert_eq!(built.metadata.document_count, 0);
        assert_eq!(built.metadata.context_length, 0);
    }

    #[test]
    fn test_prompt_does_not_interpret_user_text() {
        let question = "What does {{context}} & <b>mean</b>?";
        let built = build_prompt(question, &[]).unwrap();
        assert!(built.text.contains(question));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let documents = docs();
        let first = build_prompt("Same question", &documents).unwrap();
        let second = build_prompt("Same question", &documents).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_templates() {
        let templates = PromptTemplates {
            id: "custom".to_string(),
            context: "{{question}} => {{text}} ({{section}})".to_string(),
            prompt: "Q={{user_question}}\n{{context}}".to_string(),
        };
        let builder = PromptBuilder::new(&templates).unwrap();
        let built = builder
            .build_prompt("why", &[Document::new("S", "Q", "T")])
            .unwrap();

        assert_eq!(built.text, "Q=why\nQ => T (S)");
        assert_eq!(built.metadata.template_id, "custom");
    }

    #[test]
    fn test_unknown_variable_fails_in_strict_mode() {
        let templates = PromptTemplates {
            id: "broken".to_string(),
            context: "{{section}} {{question}} {{text}} {{course}}".to_string(),
            prompt: "{{user_question}} {{context}}".to_string(),
        };
        let builder = PromptBuilder::new(&templates).unwrap();
        let result = builder.build_context(&[Document::new("S", "Q", "T")]);
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_invalid_template_syntax() {
        let templates = PromptTemplates {
            id: "bad".to_string(),
            context: "{{#if}}".to_string(),
            prompt: "{{user_question}}".to_string(),
        };
        assert!(PromptBuilder::new(&templates).is_err());
    }
}
