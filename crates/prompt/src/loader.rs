//! Prompt loader for YAML template files.

use crate::types::{PromptFile, PromptTemplates};
use faq_core::{AppError, AppResult};
use std::path::Path;

/// Placeholders the prompt template must reference.
const PROMPT_PLACEHOLDERS: [&str; 2] = ["{{user_question}}", "{{context}}"];

/// Placeholders the document block template must reference.
const CONTEXT_PLACEHOLDERS: [&str; 3] = ["{{section}}", "{{question}}", "{{text}}"];

/// Load prompt templates from a YAML file.
///
/// Template bodies are trimmed, so YAML block scalars (`|`) may be used
/// without leaking a trailing newline into the prompt.
///
/// # Example
/// ```no_run
/// use faq_prompt::load_templates;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let templates = load_templates(Path::new("prompts/faq.yaml"))?;
/// println!("Loaded templates: {}", templates.id);
/// # Ok(())
/// # }
/// ```
pub fn load_templates(path: &Path) -> AppResult<PromptTemplates> {
    tracing::debug!("Loading prompt templates from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let file: PromptFile = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_prompt_file(&file)?;

    tracing::info!("Loaded prompt templates: {}", file.id);

    Ok(PromptTemplates {
        id: file.id,
        context: file.context.trim().to_string(),
        prompt: file.prompt.trim().to_string(),
    })
}

/// Validate a template file.
fn validate_prompt_file(file: &PromptFile) -> AppResult<()> {
    if file.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if !file.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            file.api_version
        )));
    }

    for placeholder in PROMPT_PLACEHOLDERS {
        if !file.prompt.contains(placeholder) {
            return Err(AppError::Prompt(format!(
                "Prompt template '{}' must reference {}",
                file.id, placeholder
            )));
        }
    }

    for placeholder in CONTEXT_PLACEHOLDERS {
        if !file.context.contains(placeholder) {
            return Err(AppError::Prompt(format!(
                "Context template '{}' must reference {}",
                file.id, placeholder
            )));
        }
    }

    Ok(())
}
