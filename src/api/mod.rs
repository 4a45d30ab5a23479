use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use tracing::error;

use crate::error::AppError;
use crate::models::{Course, NewReviewRequest, Review};
use crate::pages;
use crate::pages::CourseDetail;
use crate::search::SearchPolicy;
use crate::state::AppState;

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(list_courses))
        .route("/api/courses/search", get(search_courses))
        .route("/api/courses/{id}", get(course_detail))
        .route("/api/reviews", post(create_review))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.health().await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = pages::fetch_listing(state.store.as_ref()).await?;
    Ok(Json(courses))
}

/// Same policy as the interactive type-ahead: short queries answer empty
/// without touching the store, and a store failure degrades to no results.
async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>
) -> Json<Vec<Course>> {
    let policy = SearchPolicy::default();
    if !policy.meets_min_length(&params.q) {
        return Json(Vec::new());
    }

    match state.store.search_courses(params.q.trim(), policy.max_results).await {
        Ok(hits) => Json(hits),
        Err(err) => {
            error!("course search failed: {}", err);
            Json(Vec::new())
        }
    }
}

async fn course_detail(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<CourseDetail>, AppError> {
    let detail = pages::fetch_detail(state.store.as_ref(), &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(detail))
}

async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<NewReviewRequest>
) -> Result<Json<Review>, AppError> {
    let review = pages::submit_review(state.store.as_ref(), &req).await?;
    Ok(Json(review))
}
