//! Route definitions for the `/members` resource.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::member;
use crate::state::AppState;

/// Routes mounted at `/members`.
///
/// ```text
/// GET    /                    -> list (approved)
/// POST   /                    -> create
/// GET    /unapproved          -> list_unapproved
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// PATCH  /{id}/approval       -> set_approval
/// PUT    /{id}/photo          -> replace_photo
/// DELETE /{id}/photo          -> delete_photo
/// GET    /{id}/projects       -> list_projects
/// GET    /{id}/achievements   -> list_achievements
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(member::list).post(member::create))
        .route("/unapproved", get(member::list_unapproved))
        .route("/{id}", get(member::get_by_id).put(member::update))
        .route("/{id}/approval", patch(member::set_approval))
        .route(
            "/{id}/photo",
            put(member::replace_photo).delete(member::delete_photo),
        )
        .route("/{id}/projects", get(member::list_projects))
        .route("/{id}/achievements", get(member::list_achievements))
}
