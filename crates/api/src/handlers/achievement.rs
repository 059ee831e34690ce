//! Handlers for the `/achievements` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use club_core::error::CoreError;
use club_core::owner::ReplaceOutcome;
use club_core::types::{DbId, MemberId, ResourceKind, ResourceRef};
use club_db::models::achievement::{
    Achievement, AchievementWithMembers, CreateAchievement, UpdateAchievement,
};
use club_db::repositories::AchievementRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::membership::{self, AddMembers, AddMembersResult};
use crate::handlers::resource_image;
use crate::response::DataResponse;
use crate::state::AppState;

const KIND: ResourceKind = ResourceKind::Achievement;

async fn load_with_members(state: &AppState, id: DbId) -> AppResult<AchievementWithMembers> {
    let achievement = AchievementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Achievement", id))?;
    let members = AchievementRepo::list_members(&state.pool, id).await?;
    Ok(AchievementWithMembers {
        achievement,
        members,
    })
}

/// POST /api/v1/achievements
///
/// Optional `member_ids` are attached through the association manager.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAchievement>,
) -> AppResult<(StatusCode, Json<DataResponse<AchievementWithMembers>>)> {
    input.validate()?;
    let achievement = AchievementRepo::create(&state.pool, &input).await?;
    let resource = ResourceRef::achievement(achievement.id);
    membership::attach_initial(&state, resource, &input.member_ids).await?;

    tracing::info!(
        achievement_id = achievement.id,
        members = input.member_ids.len(),
        "Achievement created",
    );
    let data = load_with_members(&state, achievement.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/achievements
///
/// Most recent first.
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Achievement>>>> {
    let achievements = AchievementRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: achievements }))
}

/// GET /api/v1/achievements/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AchievementWithMembers>>> {
    let data = load_with_members(&state, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/achievements/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAchievement>,
) -> AppResult<Json<DataResponse<Achievement>>> {
    input.validate()?;
    let achievement = AchievementRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Achievement", id))?;
    Ok(Json(DataResponse { data: achievement }))
}

/// DELETE /api/v1/achievements/{id}
///
/// Removes the image, the membership set, and the achievement.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.resources.destroy(ResourceRef::achievement(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/achievements/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MemberId>>>> {
    let data = membership::list(&state, KIND, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/achievements/{id}/members
pub async fn add_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMembers>,
) -> AppResult<Json<DataResponse<AddMembersResult>>> {
    let data = membership::add(&state, KIND, id, input).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/achievements/{id}/members/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    membership::remove(&state, KIND, id, &member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/achievements/{id}/image
pub async fn replace_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ReplaceOutcome>>> {
    let data = resource_image::replace(&state, KIND, id, multipart).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/achievements/{id}/image
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    resource_image::clear(&state, KIND, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
