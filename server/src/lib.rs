use axum::{extract::{Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use pagetrail_core::feed::PageRecord;
use pagetrail_core::{Document, IndexStats, PageIndex, QueryOutcome, Syntax};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct QueryParams {
    pub q: String,
    #[serde(default)]
    pub syntax: Syntax,
}

#[derive(Deserialize)]
pub struct DocParams {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageLoadedResponse {
    pub url: String,
    pub inserted: bool,
    pub head_words: usize,
    pub body_words: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllResponse {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub visited_at: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<PageIndex>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl ToString) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.to_string() })))
}

pub fn build_app(index: Arc<PageIndex>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/pages", post(page_loaded))
        .route("/query", get(query_handler))
        .route("/all", get(all_handler))
        .route("/history", get(history_handler))
        .route("/doc", get(doc_handler))
        .route("/stats", get(stats_handler))
        .with_state(AppState { index })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Inbound page-load report. Reporting a known URL again is a no-op.
pub async fn page_loaded(State(state): State<AppState>, Json(page): Json<PageRecord>) -> Result<Json<PageLoadedResponse>, ApiError> {
    let url = page.url.trim();
    if url.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "url must not be empty"));
    }
    let reg = state.index.on_page_loaded(url, &page.head, &page.body);
    Ok(Json(PageLoadedResponse {
        url: reg.document.url.clone(),
        inserted: reg.inserted,
        head_words: reg.document.head_words.len(),
        body_words: reg.document.body_words.len(),
    }))
}

/// Syntax errors come back as 400 and leave the index untouched.
pub async fn query_handler(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Result<Json<QueryOutcome>, ApiError> {
    state
        .index
        .query(params.syntax, &params.q)
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

pub async fn all_handler(State(state): State<AppState>) -> Json<AllResponse> {
    Json(AllResponse { urls: state.index.all_urls() })
}

pub async fn history_handler(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    let entries = state
        .index
        .history()
        .iter()
        .map(|d| HistoryEntry { url: d.url.clone(), visited_at: d.visited_at.clone() })
        .collect();
    Json(entries)
}

pub async fn doc_handler(State(state): State<AppState>, Query(params): Query<DocParams>) -> Result<Json<Document>, ApiError> {
    match state.index.document(&params.url) {
        Some(doc) => Ok(Json(doc.as_ref().clone())),
        None => Err(api_error(StatusCode::NOT_FOUND, format!("{} has not been indexed", params.url))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.stats())
}
