//! HTTP request handlers for the web server.

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use url::Url;

use super::templates::{self, Notice, SnippetForm};
use super::{assets, AppState};
use crate::error::InsightError;
use crate::models::{InsightResult, PromptMode};
use crate::services::InsightRequest;

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Serve the stylesheet.
pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

/// `host[:port]` of an `Origin` header value, as it would appear in `Host`.
fn origin_authority(origin: &str) -> Option<String> {
    let url = Url::parse(origin).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Whether a request's `Origin` (if any) matches the `Host` it was sent to.
///
/// Requests without an `Origin` header (CLI clients, same-origin GETs in
/// older browsers) pass.
fn is_same_origin(headers: &HeaderMap) -> bool {
    let Some(origin) = headers.get(header::ORIGIN) else {
        return true;
    };
    let origin = origin.to_str().ok().and_then(origin_authority);
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.trim().to_ascii_lowercase());

    match (origin, host) {
        (Some(origin), Some(host)) => origin.to_ascii_lowercase() == host,
        _ => false,
    }
}

/// Middleware: refuse state-changing requests from other origins.
pub async fn require_same_origin(request: Request, next: Next) -> Response {
    let method = request.method();
    let safe = method == Method::GET || method == Method::HEAD || method == Method::OPTIONS;
    if !safe && !is_same_origin(request.headers()) {
        tracing::warn!(
            "Refusing cross-origin {} {}",
            request.method(),
            request.uri().path()
        );
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "Cross-origin requests are not allowed." })),
        )
            .into_response();
    }
    next.run(request).await
}

/// HTTP status for an error shown to a web caller.
fn status_for(err: &InsightError) -> StatusCode {
    match err {
        InsightError::StudyNotFound(_) => StatusCode::NOT_FOUND,
        InsightError::EmptyInput(_) => StatusCode::BAD_REQUEST,
        InsightError::MissingCredential => StatusCode::PRECONDITION_FAILED,
        InsightError::InvalidCredential => StatusCode::UNAUTHORIZED,
        InsightError::CallFailed(_) | InsightError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        InsightError::Busy => StatusCode::TOO_MANY_REQUESTS,
        InsightError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: InsightError) -> Response {
    (
        status_for(&err),
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Run a generation unless one is already in flight.
async fn generate_exclusive(
    state: &AppState,
    request: &InsightRequest,
) -> Result<InsightResult, InsightError> {
    let _permit = state.busy.try_acquire().map_err(|_| InsightError::Busy)?;
    let result = state.service.generate(request).await;
    if let Err(ref e) = result {
        if !e.is_input_error() {
            tracing::warn!("Generation for study {} failed: {}", request.study_id, e);
        }
    }
    result
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn render_home(state: &AppState, notice: Option<Notice>) -> Html<String> {
    let (has_key, notice) = match state.service.has_key() {
        Ok(has_key) => (has_key, notice),
        Err(e) => (false, notice.or_else(|| Some(Notice::error(e.to_string())))),
    };
    let content = templates::home(state.service.catalog().all(), has_key, notice.as_ref());
    Html(templates::base_template("Studies", &content))
}

/// Home page: key panel and study cards.
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    render_home(&state, None)
}

#[derive(Debug, Deserialize)]
pub struct KeyForm {
    #[serde(default)]
    pub key: String,
}

/// Validate and store an API key.
pub async fn save_key(State(state): State<AppState>, Form(form): Form<KeyForm>) -> Response {
    match state.service.save_key(&form.key).await {
        Ok(()) => render_home(&state, Some(Notice::success("API key validated and saved.")))
            .into_response(),
        Err(e) => (
            status_for(&e),
            render_home(&state, Some(Notice::error(e.to_string()))),
        )
            .into_response(),
    }
}

/// Remove the stored API key.
pub async fn clear_key(State(state): State<AppState>) -> Response {
    match state.service.clear_key() {
        Ok(()) => render_home(&state, Some(Notice::success("Key cleared."))).into_response(),
        Err(e) => (
            status_for(&e),
            render_home(&state, Some(Notice::error(e.to_string()))),
        )
            .into_response(),
    }
}

fn not_found(err: &InsightError) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(templates::base_template(
            "Not Found",
            &templates::not_found(&err.to_string()),
        )),
    )
        .into_response()
}

/// Study detail page with an empty snippet form.
pub async fn study_detail(State(state): State<AppState>, Path(study_id): Path<String>) -> Response {
    let study = match state.service.catalog().require(&study_id) {
        Ok(s) => s,
        Err(e) => return not_found(&e),
    };

    let form = SnippetForm {
        snippet: "",
        mode: state.default_mode,
        objective: "",
    };
    let content = templates::study_detail(study, &form, None);
    Html(templates::base_template(&study.title, &content)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
}

/// Snippet form submission: re-render the study page with insights or an error.
pub async fn analyze_form(
    State(state): State<AppState>,
    Path(study_id): Path<String>,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    let study = match state.service.catalog().require(&study_id) {
        Ok(s) => s,
        Err(e) => return not_found(&e),
    };

    let mode = form
        .mode
        .as_deref()
        .and_then(PromptMode::from_str)
        .unwrap_or(state.default_mode);
    let objective = non_blank(form.objective);

    let request = InsightRequest::new(&study.id, form.snippet.as_str())
        .with_mode(mode)
        .with_objective(objective.clone());
    let outcome = generate_exclusive(&state, &request).await;

    let values = SnippetForm {
        snippet: &form.snippet,
        mode,
        objective: objective.as_deref().unwrap_or(""),
    };
    let status = match outcome {
        Ok(_) => StatusCode::OK,
        Err(ref e) => status_for(e),
    };
    let content = templates::study_detail(study, &values, Some(&outcome));
    (
        status,
        Html(templates::base_template(&study.title, &content)),
    )
        .into_response()
}

/// API: all studies.
pub async fn api_studies(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.catalog().all().to_vec())
}

/// API: one study.
pub async fn api_study(State(state): State<AppState>, Path(study_id): Path<String>) -> Response {
    match state.service.catalog().require(&study_id) {
        Ok(study) => Json(study.clone()).into_response(),
        Err(e) => api_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct InsightBody {
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub mode: Option<PromptMode>,
    #[serde(default)]
    pub objective: Option<String>,
}

/// API: generate insights for a snippet.
pub async fn api_insights(
    State(state): State<AppState>,
    Path(study_id): Path<String>,
    Json(body): Json<InsightBody>,
) -> Response {
    let request = InsightRequest::new(study_id, body.snippet)
        .with_mode(body.mode.unwrap_or(state.default_mode))
        .with_objective(non_blank(body.objective));

    match generate_exclusive(&state, &request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => api_error(e),
    }
}
