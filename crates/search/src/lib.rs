//! Search integration crate for FAQ Bot.
//!
//! Retrieves FAQ documents from a full-text search backend. The backend is
//! hidden behind the [`SearchClient`] trait so callers can substitute a
//! deterministic fake in tests.
//!
//! # Example
//! ```no_run
//! use faq_search::{ElasticsearchClient, SearchClient, SearchRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ElasticsearchClient::new();
//! let request = SearchRequest::new("How do I run Kafka?").with_max_results(3);
//! for doc in client.search(&request).await? {
//!     println!("{:?}", doc.question);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod elasticsearch;
pub mod types;

// Re-export main types
pub use client::SearchClient;
pub use elasticsearch::{build_query_body, parse_hits, ElasticsearchClient};
pub use types::{Document, SearchRequest};
