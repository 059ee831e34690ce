//! Route definitions for the `/projects` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
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
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/image",
            put(project::replace_image).delete(project::delete_image),
        )
        .route(
            "/{id}/members",
            get(project::list_members).post(project::add_members),
        )
        .route("/{id}/members/{member_id}", delete(project::remove_member))
}
