//! Route definitions for `/media`.

use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(media::upload).delete(media::delete))
}
