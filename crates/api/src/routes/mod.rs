pub mod achievement;
pub mod health;
pub mod media;
pub mod member;
pub mod progress;
pub mod project;
pub mod question;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /members                                         list, create
/// /members/unapproved                              pending sign-ups
/// /members/{id}                                    get, update (PUT)
/// /members/{id}/approval                           approve / revoke (PATCH)
/// /members/{id}/photo                              replace (PUT multipart), delete
/// /members/{id}/projects                           member's projects
/// /members/{id}/achievements                       member's achievements
///
/// /projects                                        list, create
/// /projects/{id}                                   get (with members), update (PUT), delete
/// /projects/{id}/image                             replace (PUT multipart), delete
/// /projects/{id}/members                           list ids, add (POST)
/// /projects/{id}/members/{member_id}               remove (DELETE)
///
/// /achievements                                    list, create
/// /achievements/{id}                               get (with members), update (PUT), delete
/// /achievements/{id}/image                         replace (PUT multipart), delete
/// /achievements/{id}/members                       list ids, add (POST)
/// /achievements/{id}/members/{member_id}           remove (DELETE)
///
/// /questions                                       list, create
///
/// /progress/{member_id}                            completed question ids
/// /progress/{member_id}/questions/{id}/toggle      toggle completion (POST)
///
/// /media                                           raw upload (POST), delete (DELETE ?ref=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/members", member::router())
        .nest("/projects", project::router())
        .nest("/achievements", achievement::router())
        .nest("/questions", question::router())
        .nest("/progress", progress::router())
        .nest("/media", media::router())
}
