//! Search client abstraction.

use crate::types::{Document, SearchRequest};
use faq_core::AppResult;

/// Trait for search backends.
///
/// Implementations issue exactly one query per call and return documents in
/// the backend's relevance order. They do not retry and do not cache.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Get the backend name (e.g., "elasticsearch").
    fn backend_name(&self) -> &str;

    /// Run a ranked full-text search.
    ///
    /// # Returns
    /// Matched documents, most relevant first, at most `request.max_results`
    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<Document>>;
}
