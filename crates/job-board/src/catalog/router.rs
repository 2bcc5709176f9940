use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::{JobFilter, JobId, JobInput};
use crate::error::BoardError;
use crate::session::CurrentUser;
use crate::state::BoardState;

/// Posting endpoints mounted under `/api/v1/jobs`.
pub fn catalog_routes() -> Router<BoardState> {
    Router::new()
        .route("/api/v1/jobs", get(list_handler).post(post_handler))
        .route("/api/v1/jobs/mine", get(mine_handler))
        .route(
            "/api/v1/jobs/:job_id",
            get(get_handler).delete(delete_handler),
        )
}

pub(crate) async fn post_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
    Json(input): Json<JobInput>,
) -> Result<impl IntoResponse, BoardError> {
    let job = state.catalog.post(&caller, input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Job posted successfully",
            "job": job,
        })),
    ))
}

pub(crate) async fn list_handler(
    State(state): State<BoardState>,
    Query(filter): Query<JobFilter>,
) -> Result<impl IntoResponse, BoardError> {
    let jobs = state.catalog.list(&filter)?;
    Ok(Json(json!({
        "success": true,
        "count": jobs.len(),
        "jobs": jobs,
    })))
}

pub(crate) async fn mine_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
) -> Result<impl IntoResponse, BoardError> {
    let jobs = state.catalog.mine(&caller)?;
    Ok(Json(json!({ "success": true, "myJobs": jobs })))
}

pub(crate) async fn get_handler(
    State(state): State<BoardState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, BoardError> {
    let job = state.catalog.get(&JobId::parse(&job_id)?)?;
    Ok(Json(json!({ "success": true, "job": job })))
}

pub(crate) async fn delete_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, BoardError> {
    state.catalog.delete(&JobId::parse(&job_id)?, &caller)?;
    Ok(Json(json!({
        "success": true,
        "message": "Job deleted successfully",
    })))
}
