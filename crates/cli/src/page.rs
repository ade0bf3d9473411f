//! HTML rendering for the question page.

use faq_core::{AppError, AppResult};
use faq_rag::{FailureStage, QaAnswer, QaFailure};
use handlebars::Handlebars;
use serde::Serialize;

const PAGE_TEMPLATE_NAME: &str = "page";

/// Page title shown in the browser tab and the heading.
pub const PAGE_TITLE: &str = "DTC Q&A System";

/// Shown while the form submission is in flight.
pub const BUSY_MESSAGE: &str = "Retrieving and generating answer...";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title}}</title>
  <style>
    body { font-family: sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }
    form { display: flex; flex-direction: column; gap: .5rem; }
    input[type=text] { padding: .5rem; font-size: 1rem; }
    button { align-self: flex-start; padding: .4rem 1.2rem; }
    .answer pre { white-space: pre-wrap; font-family: inherit; }
    .error { border-left: 4px solid #c0392b; padding-left: 1rem; }
    .none { color: #555; }
  </style>
</head>
<body>
  <h1>{{title}}</h1>
  <form method="post" action="/" onsubmit="document.getElementById('busy').hidden = false;">
    <label for="question">Enter your question:</label>
    <input type="text" id="question" name="question" value="{{question}}" autofocus>
    <button type="submit">Ask</button>
  </form>
  <p id="busy" hidden>{{busy}}</p>
{{#if answer}}
  <section class="answer {{answer.kind}}">
    <h2>{{answer.heading}}</h2>
    <pre>{{answer.body}}</pre>
  </section>
{{/if}}
</body>
</html>
"#;

/// What the answer section shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerView {
    /// CSS class: "answer", "none" or "error"
    pub kind: &'static str,
    pub heading: String,
    pub body: String,
}

impl AnswerView {
    /// Successful answers are shown verbatim, including the "NONE" sentinel.
    pub fn from_answer(answer: &QaAnswer) -> Self {
        Self {
            kind: if answer.is_none() { "none" } else { "answer" },
            heading: "Answer".to_string(),
            body: answer.answer.clone(),
        }
    }

    pub fn from_failure(failure: &QaFailure) -> Self {
        let heading = match failure.stage {
            FailureStage::Retrieval => "Search failed",
            FailureStage::Formatting => "Could not build the prompt",
            FailureStage::Generation => "Answer generation failed",
        };

        Self {
            kind: "error",
            heading: heading.to_string(),
            body: failure.to_answer_text(),
        }
    }

    pub fn from_outcome(outcome: &Result<QaAnswer, QaFailure>) -> Self {
        match outcome {
            Ok(answer) => Self::from_answer(answer),
            Err(failure) => Self::from_failure(failure),
        }
    }
}

#[derive(Serialize)]
struct PageView<'a> {
    title: &'a str,
    busy: &'a str,
    question: &'a str,
    answer: Option<&'a AnswerView>,
}

/// Compiled page template.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
            .map_err(|e| AppError::Other(format!("Failed to register page template: {}", e)))?;

        Ok(Self { registry })
    }

    /// Render the page with the submitted question and an optional answer.
    ///
    /// All values are HTML-escaped.
    pub fn render(&self, question: &str, answer: Option<&AnswerView>) -> AppResult<String> {
        let view = PageView {
            title: PAGE_TITLE,
            busy: BUSY_MESSAGE,
            question,
            answer,
        };

        self.registry
            .render(PAGE_TEMPLATE_NAME, &view)
            .map_err(|e| AppError::Other(format!("Failed to render page: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_llm::LlmUsage;

    fn qa_answer(text: &str) -> QaAnswer {
        QaAnswer {
            answer: text.to_string(),
            model: "models/gemini-2.5-flash".to_string(),
            usage: LlmUsage::default(),
            documents: 1,
        }
    }

    #[test]
    fn test_render_empty_form() {
        let page = PageRenderer::new().unwrap().render("", None).unwrap();
        assert!(page.contains("<title>DTC Q&amp;A System</title>"));
        assert!(page.contains("Enter your question:"));
        assert!(page.contains(">Ask</button>"));
        assert!(page.contains(BUSY_MESSAGE));
        assert!(!page.contains("<h2>"));
    }

    #[test]
    fn test_render_answer_is_escaped() {
        let view = AnswerView::from_answer(&qa_answer("Use <script>alert(1)</script>"));
        let page = PageRenderer::new()
            .unwrap()
            .render("q\"uote", Some(&view))
            .unwrap();

        assert!(page.contains("<h2>Answer</h2>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("value=\"q&quot;uote\""));
    }

    #[test]
    fn test_none_sentinel_rendered_verbatim() {
        let view = AnswerView::from_answer(&qa_answer("NONE"));
        assert_eq!(view.kind, "none");
        assert_eq!(view.body, "NONE");

        let page = PageRenderer::new().unwrap().render("q", Some(&view)).unwrap();
        assert!(page.contains("<pre>NONE</pre>"));
    }

    #[test]
    fn test_failure_heading_by_stage() {
        let failure = QaFailure::new(
            FailureStage::Generation,
            AppError::Llm("quota or rate limit exceeded".to_string()),
        );
        let view = AnswerView::from_failure(&failure);

        assert_eq!(view.kind, "error");
        assert_eq!(view.heading, "Answer generation failed");
        assert!(view.body.starts_with(faq_rag::ERROR_PREFIX));
        assert!(view.body.contains("quota"));
    }
}
