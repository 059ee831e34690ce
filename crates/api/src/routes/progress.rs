//! Route definitions for `/progress`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// GET  /{member_id}                                 -> list_completed
/// POST /{member_id}/questions/{question_id}/toggle  -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{member_id}", get(progress::list_completed))
        .route(
            "/{member_id}/questions/{question_id}/toggle",
            post(progress::toggle),
        )
}
