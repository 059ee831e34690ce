//! Route definitions for the `/achievements` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::achievement;
use crate::state::AppState;

/// Routes mounted at `/achievements`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// PUT    /{id}/image                -> replace_image
/// DELETE /{id}/image                -> delete_image
/// GET    /{id}/members              -> list_members
/// POST   /{id}/members              -> add_members
/// DELETE /{id}/members/{member_id}  -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(achievement::list).post(achievement::create))
        .route(
            "/{id}",
            get(achievement::get_by_id)
                .put(achievement::update)
                .delete(achievement::delete),
        )
        .route(
            "/{id}/image",
            put(achievement::replace_image).delete(achievement::delete_image),
        )
        .route(
            "/{id}/members",
            get(achievement::list_members).post(achievement::add_members),
        )
        .route("/{id}/members/{member_id}", delete(achievement::remove_member))
}
