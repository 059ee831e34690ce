//! Handlers for the `/members` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use club_core::error::CoreError;
use club_core::owner::ReplaceOutcome;
use club_core::types::{MemberId, OwnerRef};
use club_db::models::achievement::Achievement;
use club_db::models::member::{CreateMember, Member, SetApproval, UpdateMember};
use club_db::models::project::Project;
use club_db::repositories::MemberRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::upload::read_form;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a member or fail with 404.
async fn find_member(state: &AppState, id: &MemberId) -> AppResult<Member> {
    Ok(MemberRepo::find_by_id(&state.pool, id.as_str())
        .await?
        .ok_or_else(|| CoreError::not_found("Member", id))?)
}

/// POST /api/v1/members
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<DataResponse<Member>>)> {
    input.validate()?;
    let member = MemberRepo::create(&state.pool, &input).await?;
    tracing::info!(member_id = %member.id, "Member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/v1/members
///
/// Approved members only.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    let members = MemberRepo::list_approved(&state.pool).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/members/unapproved
///
/// Sign-ups waiting for approval.
pub async fn list_unapproved(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    let members = MemberRepo::list_unapproved(&state.pool).await?;
    Ok(Json(DataResponse { data: members }))
}

/// PUT /api/v1/members/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateMember>,
) -> AppResult<Json<DataResponse<Member>>> {
    let id = MemberId::parse(&id)?;
    input.validate()?;
    let member = MemberRepo::update(&state.pool, id.as_str(), &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Member", &id))?;
    Ok(Json(DataResponse { data: member }))
}

/// PATCH /api/v1/members/{id}/approval
pub async fn set_approval(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetApproval>,
) -> AppResult<Json<DataResponse<Member>>> {
    let id = MemberId::parse(&id)?;
    let member = MemberRepo::set_approved(&state.pool, id.as_str(), input.is_approved)
        .await?
        .ok_or_else(|| CoreError::not_found("Member", &id))?;
    tracing::info!(member_id = %member.id, is_approved = member.is_approved, "Member approval changed");
    Ok(Json(DataResponse { data: member }))
}

/// GET /api/v1/members/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Member>>> {
    let id = MemberId::parse(&id)?;
    let member = find_member(&state, &id).await?;
    Ok(Json(DataResponse { data: member }))
}

/// GET /api/v1/members/{id}/projects
pub async fn list_projects(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let id = MemberId::parse(&id)?;
    find_member(&state, &id).await?;
    let projects = MemberRepo::list_projects(&state.pool, id.as_str()).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/members/{id}/achievements
pub async fn list_achievements(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Achievement>>>> {
    let id = MemberId::parse(&id)?;
    find_member(&state, &id).await?;
    let achievements = MemberRepo::list_achievements(&state.pool, id.as_str()).await?;
    Ok(Json(DataResponse { data: achievements }))
}

/// PUT /api/v1/members/{id}/photo
///
/// Multipart form with a required `file` image part. Replaces any
/// existing profile photo.
pub async fn replace_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ReplaceOutcome>>> {
    let owner = OwnerRef::Member(MemberId::parse(&id)?);
    let file = read_form(multipart, state.config.max_upload_bytes)
        .await?
        .require_file()?;

    let outcome = state
        .owners
        .replace(&owner, file.bytes, &file.content_type)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /api/v1/members/{id}/photo
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let owner = OwnerRef::Member(MemberId::parse(&id)?);
    state.owners.clear(&owner).await?;
    Ok(StatusCode::NO_CONTENT)
}
