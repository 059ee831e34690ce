//! Raw attachment upload and delete.
//!
//! These endpoints expose [`club_core::media::MediaLifecycle`] directly:
//! the caller receives the new locator and is responsible for binding it.
//! The owner-bound `/photo` and `/image` endpoints should be preferred.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use club_core::error::CoreError;
use club_core::media::{AttachmentUpload, UploadOutcome};
use club_core::types::OwnerRef;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::upload::read_form;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/media
///
/// Multipart form fields:
/// - `file` (required): the image
/// - `owner_kind`, `owner_id` (required): `member` / `project` / `achievement`
///   and its key
/// - `folder` (optional): defaults to the owner kind's folder
/// - `previous_ref` (optional): locator to remove after the write succeeds
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadOutcome>>)> {
    let mut form = read_form(multipart, state.config.max_upload_bytes).await?;
    let file = form.require_file()?;

    let owner = OwnerRef::parse(
        form.field("owner_kind")
            .ok_or_else(|| CoreError::InvalidInput("owner_kind is required".into()))?,
        form.field("owner_id")
            .ok_or_else(|| CoreError::InvalidInput("owner_id is required".into()))?,
    )?;
    let folder = form.field("folder").unwrap_or(owner.folder());

    let outcome = state
        .media
        .upload(AttachmentUpload {
            owner: &owner,
            payload: file.bytes,
            mime_type: &file.content_type,
            folder,
            previous: form.field("previous_ref"),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// Query parameters for [`delete`].
#[derive(Debug, Deserialize)]
pub struct DeleteMediaParams {
    #[serde(rename = "ref")]
    pub attachment_ref: String,
}

/// DELETE /api/v1/media?ref={locator}
pub async fn delete(
    State(state): State<AppState>,
    Query(params): Query<DeleteMediaParams>,
) -> AppResult<StatusCode> {
    state.media.delete(&params.attachment_ref).await?;
    Ok(StatusCode::NO_CONTENT)
}
