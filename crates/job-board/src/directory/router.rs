use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use super::domain::{LoginInput, PasswordChange, ProfileUpdate, RegistrationInput};
use crate::error::BoardError;
use crate::session::{with_session, without_session, CurrentUser};
use crate::state::BoardState;
use crate::uploads::SubmittedForm;

/// Account endpoints mounted under `/api/v1/users`.
pub fn directory_routes() -> Router<BoardState> {
    Router::new()
        .route("/api/v1/users/register", post(register_handler))
        .route("/api/v1/users/login", post(login_handler))
        .route("/api/v1/users/logout", post(logout_handler))
        .route("/api/v1/users/me", get(me_handler))
        .route("/api/v1/users/profile", put(profile_handler))
        .route("/api/v1/users/password", put(password_handler))
}

pub(crate) async fn register_handler(
    State(state): State<BoardState>,
    jar: CookieJar,
    Json(input): Json<RegistrationInput>,
) -> Result<impl IntoResponse, BoardError> {
    let directory = state.directory.clone();
    let grant = off_runtime(move || directory.register(input)).await?;
    let body = json!({
        "success": true,
        "message": "User Registered",
        "user": grant.user,
        "token": grant.token,
    });
    Ok((StatusCode::CREATED, with_session(jar, grant.token), Json(body)))
}

pub(crate) async fn login_handler(
    State(state): State<BoardState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, BoardError> {
    let directory = state.directory.clone();
    let grant = off_runtime(move || directory.login(input)).await?;
    let body = json!({
        "success": true,
        "message": "User logged in successfully",
        "user": grant.user,
        "token": grant.token,
    });
    Ok((with_session(jar, grant.token), Json(body)))
}

pub(crate) async fn logout_handler(
    CurrentUser(_user): CurrentUser,
    jar: CookieJar,
) -> impl IntoResponse {
    (
        without_session(jar),
        Json(json!({ "success": true, "message": "Logged out Successfully" })),
    )
}

pub(crate) async fn me_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(json!({ "success": true, "user": user }))
}

pub(crate) async fn profile_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, BoardError> {
    let form = SubmittedForm::read(multipart).await?;
    let update = ProfileUpdate {
        name: form.text("name"),
        email: form.text("email"),
        phone: form.text("phone"),
        address: form.text("address"),
        cover_letter: form.text("coverLetter"),
        first_niche: form.text("firstNiche"),
        second_niche: form.text("secondNiche"),
        third_niche: form.text("thirdNiche"),
    };
    let user = state
        .directory
        .update_profile(&caller, update, form.resume)?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "user": user,
    })))
}

pub(crate) async fn password_handler(
    State(state): State<BoardState>,
    CurrentUser(caller): CurrentUser,
    jar: CookieJar,
    Json(change): Json<PasswordChange>,
) -> Result<impl IntoResponse, BoardError> {
    let directory = state.directory.clone();
    let grant = off_runtime(move || directory.update_password(&caller, change)).await?;
    let body = json!({
        "success": true,
        "message": "Password updated Successfully",
        "user": grant.user,
        "token": grant.token,
    });
    Ok((with_session(jar, grant.token), Json(body)))
}

/// Password hashing is CPU bound; keep it off the async workers.
async fn off_runtime<T, F>(work: F) -> Result<T, BoardError>
where
    F: FnOnce() -> Result<T, BoardError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| BoardError::Upstream(format!("account task failed: {err}")))?
}
