use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{GenreToken, MovieDetails},
    page::{PageView, SearchOutcome},
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeyDownRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailsParams {
    pub title: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "searches_in_flight": state.controller.searches_in_flight(),
        })),
    )
}

/// Current page
pub async fn get_page(State(state): State<AppState>) -> Json<PageView> {
    Json(state.controller.view().await)
}

/// Update the query text without searching
pub async fn set_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<PageView> {
    state.controller.set_query(request.query).await;
    Json(state.controller.view().await)
}

/// Explicit search action; optionally replaces the query first
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Option<Json<SearchRequest>>,
) -> Json<PageView> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let outcome = match request.query {
        Some(query) => state.controller.submit_query(query).await,
        None => state.controller.submit().await,
    };
    log_outcome(&request_id, outcome);
    Json(state.controller.view().await)
}

/// Keyboard path; "Enter" submits the current query
pub async fn key_down(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<KeyDownRequest>,
) -> Json<PageView> {
    let outcome = state.controller.key_down(&request.key).await;
    log_outcome(&request_id, outcome);
    Json(state.controller.view().await)
}

/// Select the genre filter
pub async fn select_genre(
    State(state): State<AppState>,
    Json(request): Json<GenreRequest>,
) -> AppResult<Json<PageView>> {
    let genre: GenreToken = request.genre.parse()?;
    state.controller.select_genre(genre).await;
    Ok(Json(state.controller.view().await))
}

/// Details modal for a movie on the page
pub async fn movie_details(
    State(state): State<AppState>,
    Query(params): Query<DetailsParams>,
) -> AppResult<Json<MovieDetails>> {
    let details = state.controller.details(&params.title).await?;
    Ok(Json(details))
}

/// Search failures are already reflected in the page; they are only logged here
fn log_outcome(request_id: &RequestId, outcome: AppResult<SearchOutcome>) {
    match outcome {
        Ok(outcome) => tracing::info!(request_id = %request_id, ?outcome, "Search handled"),
        Err(e) => tracing::warn!(request_id = %request_id, error = %e, "Search degraded to empty"),
    }
}
