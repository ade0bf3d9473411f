//! Command handlers for the FAQ Bot CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use serve::ServeCommand;

use faq_core::{config::AppConfig, AppError, AppResult};
use faq_llm::create_client;
use faq_rag::{QaBot, QaSettings};
use faq_search::ElasticsearchClient;
use std::sync::Arc;

/// Wire the search client, generation client and templates from config.
pub fn build_bot(config: &AppConfig) -> AppResult<QaBot> {
    let search = ElasticsearchClient::with_base_url(&config.search.endpoint);

    let llm = create_client(
        &config.llm.provider,
        Some(&config.llm.endpoint),
        config.api_key.as_deref(),
    )
    .map_err(AppError::Config)?;

    let settings = QaSettings::from_config(config)?;
    QaBot::new(Arc::new(search), llm, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_bot_from_defaults() {
        let bot = build_bot(&AppConfig::default()).unwrap();
        assert_eq!(bot.settings().index, "course-questions");
        assert_eq!(bot.settings().max_results, 5);
    }

    #[test]
    fn test_build_bot_unknown_provider() {
        let mut config = AppConfig::default();
        config.llm.provider = "ollama".to_string();

        match build_bot(&config) {
            Err(AppError::Config(msg)) => assert!(msg.contains("Unknown provider")),
            _ => panic!("Expected config error"),
        }
    }

    #[test]
    fn test_build_bot_missing_prompt_file() {
        let mut config = AppConfig::default();
        config.prompt_file = Some("/nonexistent/prompt.yaml".into());
        assert!(build_bot(&config).is_err());
    }
}
