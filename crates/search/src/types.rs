//! Search request and document types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Index queried when the caller does not name one.
pub const DEFAULT_INDEX: &str = "course-questions";

/// Documents returned per query unless overridden.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Course tag used as the mandatory retrieval filter.
pub const DEFAULT_COURSE: &str = "data-engineering-zoomcamp";

/// An FAQ record as stored in the index `_source`.
///
/// Every field is optional so that a record missing one still deserializes;
/// the prompt builder reports the gap as a formatting error. Non-string
/// values are kept as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(
        default,
        deserialize_with = "field_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub section: Option<String>,

    #[serde(
        default,
        deserialize_with = "field_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub question: Option<String>,

    #[serde(
        default,
        deserialize_with = "field_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,

    /// Filter-only tag; never rendered into the prompt context
    #[serde(
        default,
        deserialize_with = "field_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub course: Option<String>,
}

/// Read any JSON value as text: strings as-is, `null` as absent, anything
/// else in its JSON form (`1`, `true`, `["a"]`).
fn field_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

impl Document {
    /// Create a document with the three rendered fields set.
    pub fn new(
        section: impl Into<String>,
        question: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            section: Some(section.into()),
            question: Some(question.into()),
            text: Some(text.into()),
            course: None,
        }
    }

    /// Set the course tag.
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }
}

/// A single ranked full-text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text user question
    pub query: String,

    /// Index to search
    pub index: String,

    /// Result cap (no pagination)
    pub max_results: usize,

    /// Exact-match course filter
    pub course: String,
}

impl SearchRequest {
    /// Create a request with default index, size and course filter.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            index: DEFAULT_INDEX.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            course: DEFAULT_COURSE.to_string(),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = course.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = SearchRequest::new("kafka");
        assert_eq!(request.query, "kafka");
        assert_eq!(request.index, "course-questions");
        assert_eq!(request.max_results, 5);
        assert_eq!(request.course, "data-engineering-zoomcamp");
    }

    #[test]
    fn test_document_ignores_unknown_fields() {
        let json = serde_json::json!({
            "section": "General",
            "question": "When does it start?",
            "text": "In January.",
            "course": "data-engineering-zoomcamp",
            "id": "abc123"
        });

        let doc: Document = serde_json::from_value(json).unwrap();
        assert_eq!(doc.section.as_deref(), Some("General"));
        assert_eq!(doc.course.as_deref(), Some("data-engineering-zoomcamp"));
    }

    #[test]
    fn test_document_renders_non_string_values() {
        let json = serde_json::json!({
            "section": 1,
            "question": true,
            "text": ["a", "b"],
            "course": null
        });

        let doc: Document = serde_json::from_value(json).unwrap();
        assert_eq!(doc.section.as_deref(), Some("1"));
        assert_eq!(doc.question.as_deref(), Some("true"));
        assert_eq!(doc.text.as_deref(), Some("[\"a\",\"b\"]"));
        assert!(doc.course.is_none());
    }

    #[test]
    fn test_document_tolerates_missing_fields() {
        let doc: Document = serde_json::from_value(serde_json::json!({"text": "only"})).unwrap();
        assert_eq!(doc.text.as_deref(), Some("only"));
        assert!(doc.section.is_none());
        assert!(doc.question.is_none());
    }
}
