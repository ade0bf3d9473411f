//! LLM integration crate for FAQ Bot.
//!
//! Provides a provider-agnostic [`LlmClient`] trait for single-shot text
//! generation, with Google Gemini as the hosted provider.
//!
//! # Example
//! ```no_run
//! use faq_llm::{providers::GeminiClient, LlmClient, LlmRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(std::env::var("GEMINI_API_KEY").ok());
//! let request = LlmRequest::new("Hello, world!", "gemini-2.5-flash");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::GeminiClient;
