//! Retrieval-augmented Q&A for FAQ Bot.
//!
//! Ties the search client, prompt builder and generation client into one
//! linear pipeline: search → build prompt → generate.
//!
//! # Example
//! ```no_run
//! use faq_llm::GeminiClient;
//! use faq_rag::{QaBot, QaSettings};
//! use faq_search::ElasticsearchClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bot = QaBot::new(
//!     Arc::new(ElasticsearchClient::new()),
//!     Arc::new(GeminiClient::new(std::env::var("GEMINI_API_KEY").ok())),
//!     QaSettings::default(),
//! )?;
//! println!("{}", bot.answer("How do I join the course?").await);
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod types;

pub use bot::QaBot;
pub use types::{
    normalize_question, FailureStage, QaAnswer, QaFailure, QaSettings, ERROR_PREFIX,
};
