//! Q&A orchestration.
//!
//! Sequences search, prompt assembly and generation for one question.

use crate::types::{FailureStage, QaAnswer, QaFailure, QaSettings};
use faq_core::AppResult;
use faq_llm::{LlmClient, LlmRequest};
use faq_prompt::PromptBuilder;
use faq_search::{SearchClient, SearchRequest};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Retrieval-augmented question answering over an FAQ index.
///
/// Holds only read-only handles, so one instance can serve every request.
pub struct QaBot {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LlmClient>,
    prompts: PromptBuilder,
    settings: QaSettings,
}

impl QaBot {
    /// Wire the pipeline. Fails only if the configured templates do not compile.
    pub fn new(
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LlmClient>,
        settings: QaSettings,
    ) -> AppResult<Self> {
        let prompts = PromptBuilder::new(&settings.templates)?;

        tracing::debug!(
            "Q&A pipeline ready: {} -> {} ({})",
            search.backend_name(),
            llm.provider_name(),
            settings.model
        );

        Ok(Self {
            search,
            llm,
            prompts,
            settings,
        })
    }

    pub fn settings(&self) -> &QaSettings {
        &self.settings
    }

    /// Answer a question, reporting which step failed on error.
    ///
    /// This function:
    /// 1. Retrieves up to `max_results` documents for the question
    /// 2. Renders them and the question into the prompt
    /// 3. Sends the prompt to the generation client
    pub async fn ask(&self, question: &str) -> Result<QaAnswer, QaFailure> {
        let span = tracing::info_span!("qa", question_len = question.len());
        self.run(question).instrument(span).await
    }

    /// Answer a question, flattening any failure into a displayable string.
    ///
    /// Never fails: errors come back as text starting with
    /// [`ERROR_PREFIX`](crate::types::ERROR_PREFIX).
    pub async fn answer(&self, question: &str) -> String {
        match self.ask(question).await {
            Ok(answer) => answer.answer,
            Err(failure) => failure.to_answer_text(),
        }
    }

    async fn run(&self, question: &str) -> Result<QaAnswer, QaFailure> {
        tracing::info!("Answering question");
        let started = Instant::now();

        // 1. Retrieve
        let request = SearchRequest::new(question)
            .with_index(&self.settings.index)
            .with_max_results(self.settings.max_results)
            .with_course(&self.settings.course);

        let documents = self
            .search
            .search(&request)
            .await
            .map_err(|e| fail(FailureStage::Retrieval, e))?;

        tracing::debug!(
            "Retrieved {} documents in {:?}",
            documents.len(),
            started.elapsed()
        );

        // 2. Build prompt
        let built = self
            .prompts
            .build_prompt(question, &documents)
            .map_err(|e| fail(FailureStage::Formatting, e))?;

        tracing::debug!(
            "Built prompt '{}' ({} bytes of context)",
            built.metadata.template_id,
            built.metadata.context_length
        );

        // 3. Generate
        let generation_started = Instant::now();
        let mut request = LlmRequest::new(built.text, &self.settings.model);
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| fail(FailureStage::Generation, e))?;

        tracing::debug!(
            "Generated answer in {:?} (tokens: prompt {}, completion {})",
            generation_started.elapsed(),
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );
        if !response.done {
            tracing::warn!("Answer was cut off at the token limit");
        }
        tracing::info!("Answered in {:?}", started.elapsed());

        Ok(QaAnswer {
            answer: response.content,
            model: response.model,
            usage: response.usage,
            documents: documents.len(),
        })
    }
}

fn fail(stage: FailureStage, error: faq_core::AppError) -> QaFailure {
    tracing::warn!("Q&A {} step failed: {}", stage, error);
    QaFailure::new(stage, error)
}
