//! Elasticsearch search backend.
//!
//! Issues a single `_search` request per question.
//! Query DSL: https://www.elastic.co/guide/en/elasticsearch/reference/current/query-dsl.html

use crate::client::SearchClient;
use crate::types::{Document, SearchRequest};
use faq_core::{AppError, AppResult};
use serde_json::{json, Value};

/// Fields matched by the multi-match query; `question` is boosted 3x.
pub const MATCH_FIELDS: [&str; 3] = ["question^3", "text", "section"];

/// Default Elasticsearch node.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";

/// Build the `_search` request body for a query.
///
/// The score is dominated by the best-matching field (`best_fields`) and
/// the course filter does not contribute to scoring.
pub fn build_query_body(request: &SearchRequest) -> Value {
    json!({
        "size": request.max_results,
        "query": {
            "bool": {
                "must": {
                    "multi_match": {
                        "query": request.query,
                        "fields": MATCH_FIELDS,
                        "type": "best_fields"
                    }
                },
                "filter": {
                    "term": { "course": request.course }
                }
            }
        }
    })
}

/// Extract the `_source` payloads from a `_search` response, in hit order.
pub fn parse_hits(response: Value) -> AppResult<Vec<Document>> {
    let hits = match response.pointer("/hits/hits") {
        Some(Value::Array(hits)) => hits,
        _ => {
            return Err(AppError::Search(
                "Malformed search response: missing hits.hits".to_string(),
            ))
        }
    };

    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let source = hit.get("_source").cloned().ok_or_else(|| {
                AppError::Search(format!("Search hit {} has no _source", i))
            })?;
            serde_json::from_value(source).map_err(|e| {
                AppError::Search(format!("Search hit {} has an invalid _source: {}", i, e))
            })
        })
        .collect()
}

/// Elasticsearch client.
pub struct ElasticsearchClient {
    /// Base URL of the node
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl ElasticsearchClient {
    /// Create a client for the default local node.
    ///
    /// Default URL: http://localhost:9200
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_ENDPOINT)
    }

    /// Create a client for a custom node URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// `{base}/{index}/_search`, with the index percent-encoded as a single
    /// path segment.
    fn search_url(&self, index: &str) -> AppResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            AppError::Search(format!("Invalid search endpoint {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::Search(format!("Invalid search endpoint {}", self.base_url))
            })?
            .pop_if_empty()
            .push(index)
            .push("_search");

        Ok(url)
    }
}

impl Default for ElasticsearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SearchClient for ElasticsearchClient {
    fn backend_name(&self) -> &str {
        "elasticsearch"
    }

    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<Document>> {
        tracing::info!("Searching index '{}'", request.index);
        tracing::debug!("Search request: {:?}", request);

        let body = build_query_body(request);
        let url = self.search_url(&request.index)?;

        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Search(format!("Failed to reach search backend at {}: {}", url, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!(
                "Elasticsearch error ({}): {}",
                status, error_text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        let documents = parse_hits(payload)?;
        tracing::info!("Retrieved {} documents", documents.len());

        Ok(documents)
    }
}
