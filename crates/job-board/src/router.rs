use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::applications::application_routes;
use crate::catalog::catalog_routes;
use crate::directory::directory_routes;
use crate::state::BoardState;

/// Headroom for the text fields that travel alongside a resume upload.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Every `/api/v1` route with its state applied. The request body limit
/// follows the configured resume size so multipart uploads are not cut off
/// before the upload policy can report a readable error.
pub fn board_router(state: BoardState) -> Router {
    let body_limit = state.applications.upload_policy().max_bytes() * 2 + FORM_OVERHEAD_BYTES;

    Router::new()
        .merge(directory_routes())
        .merge(catalog_routes())
        .merge(application_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
