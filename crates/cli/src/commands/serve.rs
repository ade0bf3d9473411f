//! Serve command handler.
//!
//! Runs the single-page web form: one text input, one submit button, and
//! the answer rendered below.

use crate::commands::build_bot;
use crate::page::{AnswerView, PageRenderer};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use clap::Args;
use faq_core::{config::AppConfig, AppError, AppResult};
use faq_rag::{normalize_question, QaBot};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

/// Serve the question page over HTTP
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8501", env = "FAQ_BIND")]
    pub bind: SocketAddr,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let state = AppState::new(build_bot(config)?)?;
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(self.bind).await?;
        tracing::info!("Q&A page listening on http://{}", self.bind);

        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    bot: Arc<QaBot>,
    page: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(bot: QaBot) -> AppResult<Self> {
        Ok(Self {
            bot: Arc::new(bot),
            page: Arc::new(PageRenderer::new()?),
        })
    }
}

/// Build the HTTP routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_question))
        .with_state(state)
}

/// Submitted form fields.
#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
}

/// Rendering failure, reported as a plain-text 500.
#[derive(Debug)]
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to render page: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

async fn show_form(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    Ok(Html(state.page.render("", None)?))
}

/// Handle a submission. Blank questions re-render the form without calling
/// the pipeline; anything else is passed on as typed.
async fn submit_question(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> Result<Html<String>, PageError> {
    if normalize_question(&form.question).is_none() {
        tracing::debug!("Ignoring empty submission");
        return Ok(Html(state.page.render(&form.question, None)?));
    }

    let outcome = state.bot.ask(&form.question).await;
    let view = AnswerView::from_outcome(&outcome);

    Ok(Html(state.page.render(&form.question, Some(&view))?))
}
