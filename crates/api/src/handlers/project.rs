//! Handlers for the `/projects` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use club_core::error::CoreError;
use club_core::owner::ReplaceOutcome;
use club_core::types::{DbId, MemberId, ResourceKind, ResourceRef};
use club_db::models::project::{CreateProject, Project, ProjectWithMembers, UpdateProject};
use club_db::repositories::ProjectRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::membership::{self, AddMembers, AddMembersResult};
use crate::handlers::resource_image;
use crate::response::DataResponse;
use crate::state::AppState;

const KIND: ResourceKind = ResourceKind::Project;

async fn load_with_members(state: &AppState, id: DbId) -> AppResult<ProjectWithMembers> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", id))?;
    let members = ProjectRepo::list_members(&state.pool, id).await?;
    Ok(ProjectWithMembers { project, members })
}

/// POST /api/v1/projects
///
/// Optional `member_ids` are attached through the association manager.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectWithMembers>>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, &input).await?;
    membership::attach_initial(&state, ResourceRef::project(project.id), &input.member_ids).await?;

    tracing::info!(project_id = project.id, members = input.member_ids.len(), "Project created");
    let data = load_with_members(&state, project.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectWithMembers>>> {
    let data = load_with_members(&state, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the image, the membership set, and the project.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.resources.destroy(ResourceRef::project(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MemberId>>>> {
    let data = membership::list(&state, KIND, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects/{id}/members
pub async fn add_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMembers>,
) -> AppResult<Json<DataResponse<AddMembersResult>>> {
    let data = membership::add(&state, KIND, id, input).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/projects/{id}/members/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    membership::remove(&state, KIND, id, &member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/projects/{id}/image
pub async fn replace_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ReplaceOutcome>>> {
    let data = resource_image::replace(&state, KIND, id, multipart).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/projects/{id}/image
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    resource_image::clear(&state, KIND, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
