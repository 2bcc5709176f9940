use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApplicantForm, ApplicationId};
use crate::catalog::JobId;
use crate::error::BoardError;
use crate::session::CurrentUser;
use crate::state::BoardState;
use crate::uploads::SubmittedForm;

/// Application endpoints mounted under `/api/v1/applications`. The path
/// segment is a job id for POST and an application id for DELETE.
pub fn application_routes() -> Router<BoardState> {
    Router::new()
        .route("/api/v1/applications/employer", get(employer_handler))
        .route("/api/v1/applications/jobseeker", get(seeker_handler))
        .route(
            "/api/v1/applications/:id",
            post(apply_handler).delete(delete_handler),
        )
}

pub(crate) async fn apply_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
    Path(job_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, BoardError> {
    let job_id = JobId::parse(&job_id)?;
    let form = SubmittedForm::read(multipart).await?;
    let applicant = ApplicantForm::from_form(&form)?;
    let submitted = state
        .applications
        .submit(&job_id, &caller, applicant, form.resume)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": submitted.message,
            "application": submitted.application,
        })),
    ))
}

pub(crate) async fn employer_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
) -> Result<impl IntoResponse, BoardError> {
    let applications = state.applications.for_employer(&caller)?;
    Ok(Json(json!({ "success": true, "applications": applications })))
}

pub(crate) async fn seeker_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
) -> Result<impl IntoResponse, BoardError> {
    let applications = state.applications.for_seeker(&caller)?;
    Ok(Json(json!({ "success": true, "applications": applications })))
}

pub(crate) async fn delete_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BoardError> {
    state
        .applications
        .delete(&ApplicationId::parse(&id)?, &caller)?;
    Ok(Json(json!({
        "success": true,
        "message": "Application Deleted.",
    })))
}
