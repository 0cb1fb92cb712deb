//! Web surface: a search form and a JSON contacts endpoint.
//!
//! Thin by design: every request is handed straight to a pipeline and the
//! response rendered inline; there is no template engine and no state
//! beyond the pipelines themselves.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::models::SearchRequirement;
use crate::pdf::PdfError;
use crate::pipeline::{ContactPipeline, ContactReport, SearchPipeline};

/// Shared server state; pipelines are cheap to clone per request
#[derive(Debug)]
pub struct AppState {
    /// Requirement-to-papers pipeline
    pub search: SearchPipeline,
    /// PDF-to-roster pipeline
    pub contacts: ContactPipeline,
    /// Defaults applied when the form leaves fields blank
    pub defaults: SearchConfig,
}

/// Fields posted from the search form.
///
/// Numeric fields arrive as strings so a blank input falls back to the
/// configured defaults instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    requirement: String,
    days_back: Option<String>,
    max_results: Option<String>,
    author: Option<String>,
}

impl SearchForm {
    fn parsed<T: std::str::FromStr>(field: &Option<String>) -> Option<T> {
        field.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// JSON body for the contacts endpoint
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    url: String,
    title: Option<String>,
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    error: String,
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(search))
        .route("/contacts", post(contacts))
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(form_page(None))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let mut request = SearchRequirement::new(form.requirement.trim())
        .days_back(SearchForm::parsed(&form.days_back).unwrap_or(state.defaults.days_back))
        .max_results(SearchForm::parsed(&form.max_results).unwrap_or(state.defaults.max_results));
    if let Some(author) = form.author.filter(|a| !a.trim().is_empty()) {
        request = request.author(author.trim());
    }

    match state.search.run(&request).await {
        Ok(outcome) => Html(results_page(&outcome.expression, &outcome.papers)),
        // Search trouble is an empty result set plus a diagnostic, not a 500
        Err(e) => {
            tracing::warn!("Search failed: {}", e);
            Html(form_page(Some(&format!("Search failed: {}", e))))
        }
    }
}

async fn contacts(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactReport>, (StatusCode, Json<ErrorBody>)> {
    state
        .contacts
        .run(&request.url, request.title.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::warn!("Contact extraction failed for {}: {}", request.url, e);
            (
                status_for(&e),
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
        })
}

/// HTTP status for a PDF pipeline failure
fn status_for(error: &PdfError) -> StatusCode {
    match error {
        PdfError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        PdfError::Fetch(_) | PdfError::Io(_) => StatusCode::BAD_GATEWAY,
        PdfError::Pdf(_) | PdfError::NoPages | PdfError::NoText => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn form_page(notice: Option<&str>) -> String {
    let notice = notice
        .map(|n| format!("<p><em>{}</em></p>", escape(n)))
        .unwrap_or_default();
    format!(
        "<!doctype html><title>Scholar Scout</title><h1>Find papers</h1>{}\
<form method=\"post\">\
<p>Research interest: <input type=\"text\" name=\"requirement\" size=\"50\"></p>\
<p>Days back: <input type=\"number\" name=\"days_back\" min=\"0\" placeholder=\"30\"></p>\
<p>Max results: <input type=\"number\" name=\"max_results\" min=\"1\" placeholder=\"10\"></p>\
<p>Author (optional): <input type=\"text\" name=\"author\"></p>\
<p><input type=\"submit\" value=\"Search\"></p>\
</form>",
        notice
    )
}

fn results_page(expression: &str, papers: &[crate::models::PaperRecord]) -> String {
    let mut items = String::new();
    for paper in papers {
        items.push_str(&format!(
            "<li><a href=\"{}\">{}</a> ({}) - {}<br><a href=\"{}\">PDF</a></li>",
            escape(&paper.url),
            escape(&paper.title),
            escape(paper.published.as_deref().unwrap_or("unknown date")),
            escape(&paper.authors.join(", ")),
            escape(&paper.pdf_url),
        ));
    }
    format!(
        "<!doctype html><title>Scholar Scout</title><h1>Results</h1>\
<p>Query: <code>{}</code></p><ul>{}</ul><p><a href=\"/\">New search</a></p>",
        escape(expression),
        items
    )
}
