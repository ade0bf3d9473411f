//! Ask command handler.
//!
//! Answers a single question from the terminal.

use crate::commands::build_bot;
use clap::Args;
use faq_core::{config::AppConfig, AppError, AppResult};
use faq_rag::{normalize_question, QaAnswer, QaFailure};

/// Ask a single question and print the answer
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let question = normalize_question(&self.question)
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        let bot = build_bot(config)?;

        match bot.ask(question).await {
            Ok(answer) => {
                if self.json {
                    println!("{}", answer_json(&answer)?);
                } else {
                    println!("{}", answer.answer);
                }

                tracing::debug!(
                    "Token usage - Prompt: {}, Completion: {}, Total: {}",
                    answer.usage.prompt_tokens,
                    answer.usage.completion_tokens,
                    answer.usage.total_tokens
                );
                Ok(())
            }
            Err(failure) => {
                if self.json {
                    println!("{}", failure_json(&failure)?);
                } else {
                    println!("{}", failure.to_answer_text());
                }
                Err(failure.error)
            }
        }
    }
}

fn answer_json(answer: &QaAnswer) -> AppResult<String> {
    let output = serde_json::json!({
        "answer": answer.answer,
        "model": answer.model,
        "documents": answer.documents,
        "usage": {
            "promptTokens": answer.usage.prompt_tokens,
            "completionTokens": answer.usage.completion_tokens,
            "totalTokens": answer.usage.total_tokens
        }
    });

    Ok(serde_json::to_string_pretty(&output)?)
}

fn failure_json(failure: &QaFailure) -> AppResult<String> {
    let output = serde_json::json!({
        "error": failure.to_answer_text(),
        "stage": failure.stage,
    });

    Ok(serde_json::to_string_pretty(&output)?)
}
